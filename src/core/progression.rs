//! Level-up choices.
//!
//! Which choice a level offers is decided by [`CHOICE_TABLE`], consulted once
//! per level in order. Levels gained in one burst are queued and offered one
//! at a time: at most one [`PendingChoice`] exists and combat stays frozen
//! until it is resolved.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::character::player::Player;
use crate::core::constants::{MAX_POWER_TIER, POWER_CHOICE_OPTIONS, STANCE_ENHANCEMENT_OPTIONS};
use crate::core::error::{ActionError, ActionResult};
use crate::core::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceKind {
    PathSelection,
    PowerChoice,
    PowerUpgrade,
    StanceEnhancement,
}

impl fmt::Display for ChoiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChoiceKind::PathSelection => "path selection",
            ChoiceKind::PowerChoice => "power choice",
            ChoiceKind::PowerUpgrade => "power upgrade",
            ChoiceKind::StanceEnhancement => "stance enhancement",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelRule {
    Exactly(u32),
    /// Every odd level from the given one
    OddFrom(u32),
    /// Every level from the given one
    From(u32),
}

impl LevelRule {
    pub fn matches(&self, level: u32) -> bool {
        match *self {
            LevelRule::Exactly(l) => level == l,
            LevelRule::OddFrom(l) => level >= l && level % 2 == 1,
            LevelRule::From(l) => level >= l,
        }
    }
}

/// Which players a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    /// No path chosen yet
    Unpathed,
    Active,
    Passive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceRule {
    pub levels: LevelRule,
    pub track: Track,
    pub kind: ChoiceKind,
}

/// Level -> choice. The first rule that matches and has options wins.
/// The level-2 power choice for active paths is chained from path selection.
pub const CHOICE_TABLE: &[ChoiceRule] = &[
    ChoiceRule {
        levels: LevelRule::Exactly(2),
        track: Track::Unpathed,
        kind: ChoiceKind::PathSelection,
    },
    ChoiceRule {
        levels: LevelRule::Exactly(4),
        track: Track::Active,
        kind: ChoiceKind::PowerChoice,
    },
    ChoiceRule {
        levels: LevelRule::OddFrom(3),
        track: Track::Active,
        kind: ChoiceKind::PowerUpgrade,
    },
    ChoiceRule {
        levels: LevelRule::From(3),
        track: Track::Passive,
        kind: ChoiceKind::StanceEnhancement,
    },
];

fn player_track(player: &Player, catalog: &Catalog) -> Option<Track> {
    match player.path {
        None => Some(Track::Unpathed),
        Some(id) => catalog.path(id).map(|path| {
            if path.is_active() {
                Track::Active
            } else {
                Track::Passive
            }
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChoice {
    pub kind: ChoiceKind,
    pub level: u32,
    pub options: Vec<ChoiceOption>,
}

impl PendingChoice {
    pub fn option(&self, id: &str) -> Option<&ChoiceOption> {
        self.options.iter().find(|o| o.id == id)
    }
}

/// Draws up to `count` items without replacement.
fn draw<T, R: RandomSource + ?Sized>(mut candidates: Vec<T>, count: usize, rng: &mut R) -> Vec<T> {
    let mut drawn = Vec::new();
    while drawn.len() < count && !candidates.is_empty() {
        let index = rng.pick_index(candidates.len()).min(candidates.len() - 1);
        drawn.push(candidates.remove(index));
    }
    drawn
}

/// Options a choice of `kind` would offer at `level`. Empty means the
/// choice is skipped.
pub fn build_options<R: RandomSource + ?Sized>(
    kind: ChoiceKind,
    level: u32,
    player: &Player,
    catalog: &Catalog,
    rng: &mut R,
) -> Vec<ChoiceOption> {
    match kind {
        ChoiceKind::PathSelection => catalog
            .paths
            .iter()
            .filter(|p| p.class == player.class)
            .map(|p| ChoiceOption {
                id: p.id.key().to_string(),
                name: p.name.to_string(),
                description: p.description.to_string(),
            })
            .collect(),
        ChoiceKind::PowerChoice => {
            let Some(path) = player.path.and_then(|id| catalog.path(id)) else {
                return Vec::new();
            };
            let candidates: Vec<_> = path
                .powers
                .iter()
                .filter(|id| !player.knows_power(id))
                .filter_map(|id| catalog.power(id))
                .map(|power| ChoiceOption {
                    id: power.id.to_string(),
                    name: power.name.to_string(),
                    description: power.description.to_string(),
                })
                .collect();
            draw(candidates, POWER_CHOICE_OPTIONS, rng)
        }
        ChoiceKind::PowerUpgrade => player
            .powers()
            .iter()
            .filter(|learned| learned.tier < MAX_POWER_TIER)
            .filter_map(|learned| {
                catalog.power(&learned.id).map(|power| ChoiceOption {
                    id: power.id.to_string(),
                    name: power.name.to_string(),
                    description: format!("Tier {} -> {}", learned.tier, learned.tier + 1),
                })
            })
            .collect(),
        ChoiceKind::StanceEnhancement => {
            let Some(stances) = player
                .path
                .and_then(|id| catalog.path(id))
                .and_then(|p| p.stances())
            else {
                return Vec::new();
            };
            let unlocked = player
                .stance
                .as_ref()
                .map(|s| s.unlocked.as_slice())
                .unwrap_or(&[]);

            // Tracks alternate by level; an exhausted track yields to the other.
            let first = (level.saturating_sub(3) % 2) as usize;
            for stance_id in [stances[first], stances[1 - first]] {
                let Some(stance) = catalog.stance(stance_id) else {
                    continue;
                };
                let options: Vec<_> = stance
                    .enhancements
                    .iter()
                    .filter(|id| !unlocked.iter().any(|u| u == *id))
                    .filter_map(|id| catalog.enhancement(id))
                    .take(STANCE_ENHANCEMENT_OPTIONS)
                    .map(|e| ChoiceOption {
                        id: e.id.to_string(),
                        name: e.name.to_string(),
                        description: format!("{} ({})", e.description, stance.name),
                    })
                    .collect();
                if !options.is_empty() {
                    return options;
                }
            }
            Vec::new()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressionState {
    pending: Option<PendingChoice>,
    queued_levels: VecDeque<u32>,
}

impl ProgressionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<&PendingChoice> {
        self.pending.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn queued_levels(&self) -> impl Iterator<Item = u32> + '_ {
        self.queued_levels.iter().copied()
    }

    pub fn queue_levels(&mut self, levels: &[u32]) {
        self.queued_levels.extend(levels.iter().copied());
    }

    /// Offers a specific choice unless one is already pending or it has no
    /// options. Returns true if the choice is now pending.
    pub fn offer<R: RandomSource + ?Sized>(
        &mut self,
        kind: ChoiceKind,
        level: u32,
        player: &Player,
        catalog: &Catalog,
        rng: &mut R,
    ) -> bool {
        if self.pending.is_some() {
            return false;
        }
        let options = build_options(kind, level, player, catalog, rng);
        if options.is_empty() {
            return false;
        }
        self.pending = Some(PendingChoice {
            kind,
            level,
            options,
        });
        true
    }

    /// Works through queued levels until one produces a choice. Returns the
    /// kind of the newly pending choice, if any.
    pub fn advance<R: RandomSource + ?Sized>(
        &mut self,
        player: &Player,
        catalog: &Catalog,
        rng: &mut R,
    ) -> Option<ChoiceKind> {
        while self.pending.is_none() {
            let level = self.queued_levels.pop_front()?;
            let Some(track) = player_track(player, catalog) else {
                continue;
            };
            for rule in CHOICE_TABLE {
                if rule.track != track || !rule.levels.matches(level) {
                    continue;
                }
                if self.offer(rule.kind, level, player, catalog, rng) {
                    return Some(rule.kind);
                }
            }
        }
        None
    }

    /// Checks that `option_id` answers the pending choice of `kind`.
    pub fn check(&self, kind: ChoiceKind, option_id: &str) -> ActionResult<&PendingChoice> {
        let pending = self.pending.as_ref().ok_or(ActionError::NoPendingChoice)?;
        if pending.kind != kind {
            return Err(ActionError::WrongChoiceKind {
                expected: kind,
                pending: pending.kind,
            });
        }
        if pending.option(option_id).is_none() {
            return Err(ActionError::InvalidOption(option_id.to_string()));
        }
        Ok(pending)
    }

    /// Validates and consumes the pending choice. State is unchanged on error.
    pub fn take(&mut self, kind: ChoiceKind, option_id: &str) -> ActionResult<PendingChoice> {
        self.check(kind, option_id)?;
        self.pending.take().ok_or(ActionError::NoPendingChoice)
    }
}
