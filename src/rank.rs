//! Rank bookkeeping for finished games against the bot.
use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::error::RankError;

/// Points credited to the player for beating the bot.
pub const HUMAN_WIN_POINTS: u32 = 50;
/// Points credited to the player when the bot wins.
pub const BOT_WIN_POINTS: u32 = 10;

pub trait RankStore: Debug {
    /// Add `points` to the rank of `username`, creating the entry if needed.
    fn record_win(&mut self, username: &str, points: u32) -> Result<(), RankError>;

    /// The current rank of `username`, 0 for unknown users.
    fn rank(&self, username: &str) -> Result<u32, RankError>;

    /// All users sorted by rank, highest first. Ties are ordered by name.
    fn leaderboard(&self) -> Result<Vec<(String, u32)>, RankError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryRankStore {
    ranks: HashMap<String, u32>,
}

impl MemoryRankStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RankStore for MemoryRankStore {
    fn record_win(&mut self, username: &str, points: u32) -> Result<(), RankError> {
        let rank = self.ranks.entry(username.to_owned()).or_insert(0);
        *rank = rank.saturating_add(points);
        Ok(())
    }

    fn rank(&self, username: &str) -> Result<u32, RankError> {
        Ok(self.ranks.get(username).copied().unwrap_or(0))
    }

    fn leaderboard(&self) -> Result<Vec<(String, u32)>, RankError> {
        Ok(sorted_by_rank(self.ranks.iter().map(|(name, &rank)| (name.clone(), rank))))
    }
}

/// A [RankStore] kept in a TOML file, rewritten after every update.
#[derive(Debug)]
pub struct FileRankStore {
    path: PathBuf,
    ranks: BTreeMap<String, u32>,
}

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct RankFile {
    #[serde(default)]
    ranks: BTreeMap<String, u32>,
}

impl FileRankStore {
    /// Open the store at `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RankError> {
        let path = path.as_ref().to_path_buf();

        let ranks = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| RankError::Io {
                path: path.clone(),
                source,
            })?;
            toml::from_str::<RankFile>(&content)?.ranks
        } else {
            BTreeMap::new()
        };

        Ok(FileRankStore { path, ranks })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), RankError> {
        let file = RankFile {
            ranks: self.ranks.clone(),
        };
        let content = toml::to_string(&file)?;
        std::fs::write(&self.path, content).map_err(|source| RankError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl RankStore for FileRankStore {
    fn record_win(&mut self, username: &str, points: u32) -> Result<(), RankError> {
        let rank = self.ranks.entry(username.to_owned()).or_insert(0);
        *rank = rank.saturating_add(points);
        self.save()?;
        log::info!("{} gained {} points, rank file {}", username, points, self.path.display());
        Ok(())
    }

    fn rank(&self, username: &str) -> Result<u32, RankError> {
        Ok(self.ranks.get(username).copied().unwrap_or(0))
    }

    fn leaderboard(&self) -> Result<Vec<(String, u32)>, RankError> {
        Ok(sorted_by_rank(self.ranks.iter().map(|(name, &rank)| (name.clone(), rank))))
    }
}

fn sorted_by_rank(entries: impl Iterator<Item = (String, u32)>) -> Vec<(String, u32)> {
    entries
        .sorted_by(|(name_a, rank_a), (name_b, rank_b)| rank_b.cmp(rank_a).then_with(|| name_a.cmp(name_b)))
        .collect()
}
