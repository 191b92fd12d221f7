//! Record store over one project's stakeholder file.
//!
//! Every operation reads the whole document, and every mutation writes the
//! whole document back; nothing is edited in place. Mutations within one
//! store are serialised, but nothing guards against another process (or a
//! person with an editor) writing the same file: the last write wins.

pub(crate) mod normalize;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{Result, StoreError};
use crate::lookup::{self, MatchTier};
use crate::markdown::{parse_document, serialize_document};
use crate::models::*;

/// File name of the stakeholder document inside a project directory.
pub const STAKEHOLDER_FILE_NAME: &str = "stakeholders.md";

enum Backing {
    File(PathBuf),
    /// Holds the serialized document, so tests exercise the same text path.
    Memory(Mutex<Option<String>>),
}

struct Inner {
    backing: Backing,
    write_lock: Mutex<()>,
}

/// A stakeholder returned from a fuzzy search, with the tier it matched at.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StakeholderMatch {
    pub tier: MatchTier,
    pub stakeholder: Stakeholder,
}

#[derive(Clone)]
pub struct StakeholderStore {
    inner: Arc<Inner>,
}

impl StakeholderStore {
    /// Store backed by `stakeholders.md` inside `project_dir`. Nothing touches
    /// the disk until the first read or write.
    pub fn open(project_dir: impl Into<PathBuf>) -> Self {
        Self::with_backing(Backing::File(
            project_dir.into().join(STAKEHOLDER_FILE_NAME),
        ))
    }

    pub fn open_memory() -> Self {
        Self::with_backing(Backing::Memory(Mutex::new(None)))
    }

    fn with_backing(backing: Backing) -> Self {
        Self {
            inner: Arc::new(Inner {
                backing,
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Path of the backing file, or `None` for an in-memory store.
    pub fn path(&self) -> Option<&Path> {
        match &self.inner.backing {
            Backing::File(path) => Some(path),
            Backing::Memory(_) => None,
        }
    }

    // ============================================================
    // Raw document access
    // ============================================================

    async fn read_text(&self) -> Result<Option<String>> {
        match &self.inner.backing {
            Backing::File(path) => match tokio::fs::read_to_string(path).await {
                Ok(text) => Ok(Some(text)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            },
            Backing::Memory(cell) => Ok(cell.lock().await.clone()),
        }
    }

    async fn write_text(&self, text: String) -> Result<()> {
        match &self.inner.backing {
            Backing::File(path) => {
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::write(path, text).await?;
            }
            Backing::Memory(cell) => {
                *cell.lock().await = Some(text);
            }
        }
        Ok(())
    }

    /// Current document text as written by the last save, if any.
    pub async fn raw(&self) -> Result<Option<String>> {
        self.read_text().await
    }

    /// Load the file, or an empty version-tagged file if none exists yet.
    pub async fn load(&self) -> Result<StakeholderFile> {
        Ok(match self.read_text().await? {
            Some(text) => parse_document(&text),
            None => StakeholderFile::new(),
        })
    }

    async fn save(&self, file: &StakeholderFile) -> Result<()> {
        self.write_text(serialize_document(file)).await?;
        tracing::debug!(
            path = ?self.path(),
            stakeholders = file.stakeholders.len(),
            conflicts = file.conflict_resolutions.len(),
            "Saved stakeholder file"
        );
        Ok(())
    }

    /// Reload, apply `f`, refresh `updated_at` and write back. Nothing is
    /// written if `f` fails.
    async fn mutate<T>(
        &self,
        f: impl FnOnce(&mut StakeholderFile) -> Result<T>,
    ) -> Result<T> {
        let _guard = self.inner.write_lock.lock().await;
        let mut file = self.load().await?;
        let out = f(&mut file)?;
        file.touch();
        self.save(&file).await?;
        Ok(out)
    }

    /// Canonical markdown for the current file.
    pub async fn render(&self) -> Result<String> {
        Ok(serialize_document(&self.load().await?))
    }

    // ============================================================
    // Stakeholder operations
    // ============================================================

    pub async fn add(&self, stakeholder: Stakeholder) -> Result<Stakeholder> {
        let stakeholder = normalize::stakeholder(stakeholder);
        self.mutate(|file| {
            if file.contains(&stakeholder.name) {
                return Err(StoreError::DuplicateName(stakeholder.name.clone()));
            }
            file.stakeholders.push(stakeholder.clone());
            Ok(stakeholder)
        })
        .await
    }

    /// Exact, case-sensitive lookup. Use [`find`](Self::find) for fuzzy matching.
    pub async fn get(&self, name: &str) -> Result<Option<Stakeholder>> {
        Ok(self.load().await?.stakeholder(name).cloned())
    }

    pub async fn update(&self, name: &str, input: UpdateStakeholderInput) -> Result<Stakeholder> {
        let input = normalize::update(input);
        self.mutate(|file| {
            let index = file
                .position(name)
                .ok_or_else(|| StoreError::NotFound(name.to_string()))?;

            if let Some(new_name) = &input.name {
                if new_name != name && file.contains(new_name) {
                    return Err(StoreError::DuplicateName(new_name.clone()));
                }
            }

            let target = &mut file.stakeholders[index];
            input.apply_to(target);
            Ok(target.clone())
        })
        .await
    }

    pub async fn remove(&self, name: &str) -> Result<Stakeholder> {
        self.mutate(|file| {
            let index = file
                .position(name)
                .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
            Ok(file.stakeholders.remove(index))
        })
        .await
    }

    /// Summaries in document order. Never writes.
    pub async fn list(&self) -> Result<Vec<StakeholderSummary>> {
        Ok(self
            .load()
            .await?
            .stakeholders
            .iter()
            .map(Stakeholder::summary)
            .collect())
    }

    // ============================================================
    // Goal-issue links
    // ============================================================

    /// Link `issue` to a goal. Linking an already linked issue changes nothing
    /// but the timestamp.
    pub async fn link_issue_to_goal(
        &self,
        name: &str,
        goal_text: &str,
        issue: u64,
    ) -> Result<StakeholderGoal> {
        self.mutate(|file| {
            let goal = find_goal(file, name, goal_text)?;
            goal.link(issue);
            Ok(goal.clone())
        })
        .await
    }

    /// Unlink `issue` from a goal. Unlinking an issue that is not linked is a no-op.
    pub async fn unlink_issue_from_goal(
        &self,
        name: &str,
        goal_text: &str,
        issue: u64,
    ) -> Result<StakeholderGoal> {
        self.mutate(|file| {
            let goal = find_goal(file, name, goal_text)?;
            goal.unlink(issue);
            Ok(goal.clone())
        })
        .await
    }

    /// Every goal linking `issue`, in document order.
    pub async fn goals_for_issue(&self, issue: u64) -> Result<Vec<IssueGoalRef>> {
        let file = self.load().await?;
        Ok(file
            .stakeholders
            .iter()
            .flat_map(|s| {
                s.goals
                    .iter()
                    .filter(move |g| g.linked_issues.contains(&issue))
                    .map(move |g| IssueGoalRef {
                        stakeholder: s.name.clone(),
                        goal: g.text.clone(),
                    })
            })
            .collect())
    }

    // ============================================================
    // Conflict resolutions
    // ============================================================

    /// Append to the conflict log. Party names are not checked against the
    /// stakeholder list.
    pub async fn add_conflict_resolution(
        &self,
        resolution: ConflictResolution,
    ) -> Result<ConflictResolution> {
        let resolution = normalize::conflict(resolution);
        self.mutate(|file| {
            file.conflict_resolutions.push(resolution.clone());
            Ok(resolution)
        })
        .await
    }

    pub async fn conflict_resolutions(&self) -> Result<Vec<ConflictResolution>> {
        Ok(self.load().await?.conflict_resolutions)
    }

    /// Conflicts where `name` is either party (exact match).
    pub async fn conflicts_involving(&self, name: &str) -> Result<Vec<ConflictResolution>> {
        Ok(self
            .load()
            .await?
            .conflict_resolutions
            .into_iter()
            .filter(|c| c.involves(name))
            .collect())
    }

    // ============================================================
    // Fuzzy lookup
    // ============================================================

    pub async fn find(&self, query: &str) -> Result<Option<Stakeholder>> {
        let file = self.load().await?;
        Ok(lookup::find(&file.stakeholders, query).cloned())
    }

    pub async fn find_all(&self, query: &str) -> Result<Vec<StakeholderMatch>> {
        let file = self.load().await?;
        Ok(lookup::find_all(&file.stakeholders, query)
            .into_iter()
            .map(|m| StakeholderMatch {
                tier: m.tier,
                stakeholder: m.stakeholder.clone(),
            })
            .collect())
    }
}

fn find_goal<'a>(
    file: &'a mut StakeholderFile,
    name: &str,
    goal_text: &str,
) -> Result<&'a mut StakeholderGoal> {
    let stakeholder = file
        .stakeholder_mut(name)
        .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
    stakeholder
        .goal_mut(goal_text)
        .ok_or_else(|| StoreError::GoalNotFound {
            stakeholder: name.to_string(),
            goal: goal_text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failed_mutation_writes_nothing() {
        let store = StakeholderStore::open_memory();
        let err = store.remove("Nobody").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(name) if name == "Nobody"));
        assert!(store.raw().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn mutation_refreshes_updated_at() {
        let store = StakeholderStore::open_memory();
        store.add(Stakeholder::new("Ops", "", "")).await.unwrap();
        let first = store.load().await.unwrap().updated_at;

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store
            .add_conflict_resolution(ConflictResolution {
                date: chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                stakeholder1: "Ops".to_string(),
                stakeholder2: "Dev".to_string(),
                conflict: "c".to_string(),
                decision: "d".to_string(),
                rationale: "r".to_string(),
            })
            .await
            .unwrap();
        assert!(store.load().await.unwrap().updated_at > first);
    }

    #[tokio::test]
    async fn read_only_operations_do_not_write() {
        let store = StakeholderStore::open_memory();
        store.list().await.unwrap();
        store.get("Ops").await.unwrap();
        store.find("ops").await.unwrap();
        assert!(store.raw().await.unwrap().is_none());
    }
}
