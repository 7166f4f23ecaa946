use serde::{Deserialize, Serialize};

use fairway_banker::{Banker, BankerResult, BankerRound};
use fairway_bingo::{Bingo, BingoResult, BingoRound, Mark};
use fairway_bloodsome::{Bloodsome, BloodsomeResult, BloodsomeRound, Drive};
use fairway_core::game_trait::{GameType, ScoringGame};
use fairway_core::hole::{HOLES, MAX_STROKES, PerHole, Score, is_recordable};
use fairway_core::player::{Side, Team};
use fairway_core::settlement::Settlement;
use fairway_core::validation::{ScoreCheck, validate_score};
use fairway_nassau::{Nassau, NassauResult, NassauRound, Press, PressRejected};
use fairway_skins::{Skins, SkinsResult, SkinsRound};
use fairway_stableford::{Stableford, StablefordResult, StablefordRound};
use fairway_vegas::{Vegas, VegasResult, VegasRound};
use fairway_wolf::{Wolf, WolfChoice, WolfResult, WolfRound};

use crate::config::GameDefaults;
use crate::error::EditError;

/// Input for whichever game is being played, tagged by `gameType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gameType", rename_all = "lowercase")]
pub enum Round {
    Nassau(NassauRound),
    Skins(SkinsRound),
    Wolf(WolfRound),
    Bingo(BingoRound),
    Bloodsome(BloodsomeRound),
    Stableford(StablefordRound),
    Banker(BankerRound),
    Vegas(VegasRound),
}

/// Derived result for the active game.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "gameType", rename_all = "lowercase")]
pub enum RoundResult {
    Nassau(NassauResult),
    Skins(SkinsResult),
    Wolf(WolfResult),
    Bingo(BingoResult),
    Bloodsome(BloodsomeResult),
    Stableford(StablefordResult),
    Banker(BankerResult),
    Vegas(VegasResult),
}

impl RoundResult {
    pub fn settlement(&self) -> &Settlement {
        match self {
            RoundResult::Nassau(r) => &r.settlement,
            RoundResult::Skins(r) => &r.settlement,
            RoundResult::Wolf(r) => &r.settlement,
            RoundResult::Bingo(r) => &r.settlement,
            RoundResult::Bloodsome(r) => &r.settlement,
            RoundResult::Stableford(r) => &r.settlement,
            RoundResult::Banker(r) => &r.settlement,
            RoundResult::Vegas(r) => &r.settlement,
        }
    }
}

fn check_hole(hole: usize) -> Result<usize, EditError> {
    if (1..=HOLES).contains(&hole) {
        Ok(hole - 1)
    } else {
        Err(EditError::HoleOutOfRange(hole))
    }
}

fn check_slot(slot: usize, slots: usize) -> Result<usize, EditError> {
    if (1..=slots).contains(&slot) {
        Ok(slot - 1)
    } else {
        Err(EditError::PlayerOutOfRange {
            player: slot,
            players: slots,
        })
    }
}

impl Round {
    /// A blank round with each game's own defaults.
    pub fn new(game: GameType) -> Self {
        match game {
            GameType::Nassau => Round::Nassau(NassauRound::default()),
            GameType::Skins => Round::Skins(SkinsRound::default()),
            GameType::Wolf => Round::Wolf(WolfRound::default()),
            GameType::Bingo => Round::Bingo(BingoRound::default()),
            GameType::Bloodsome => Round::Bloodsome(BloodsomeRound::default()),
            GameType::Stableford => Round::Stableford(StablefordRound::default()),
            GameType::Banker => Round::Banker(BankerRound::default()),
            GameType::Vegas => Round::Vegas(VegasRound::default()),
        }
    }

    /// A blank round with configured stakes layered over the game defaults.
    pub fn with_defaults(game: GameType, defaults: &GameDefaults) -> Self {
        let mut round = Round::new(game);
        match &mut round {
            Round::Nassau(r) => {
                if let Some(wager) = defaults.wager {
                    r.wager = wager;
                }
                if let Some(rule) = defaults.press_rule {
                    r.press_rule = rule;
                }
            },
            Round::Skins(r) => {
                if let Some(wager) = defaults.wager {
                    r.wager = wager;
                }
            },
            Round::Bloodsome(r) => {
                if let Some(wager) = defaults.wager {
                    r.wager = wager;
                }
            },
            Round::Wolf(r) => {
                if let Some(value) = defaults.point_value {
                    r.point_value = value;
                }
                if let Some(mult) = defaults.lone_multiplier {
                    r.lone_multiplier = mult;
                }
            },
            Round::Bingo(r) => {
                if let Some(value) = defaults.point_value {
                    r.point_value = value;
                }
            },
            Round::Stableford(r) => {
                if let Some(value) = defaults.point_value {
                    r.point_value = value;
                }
            },
            Round::Banker(r) => {
                if let Some(value) = defaults.point_value {
                    r.point_value = value;
                }
                if let Some(quota) = defaults.quota {
                    r.quotas = [quota; fairway_banker::PLAYERS];
                }
            },
            Round::Vegas(r) => {
                if let Some(value) = defaults.point_value {
                    r.point_value = value;
                }
            },
        }
        round
    }

    pub fn game_type(&self) -> GameType {
        match self {
            Round::Nassau(_) => GameType::Nassau,
            Round::Skins(_) => GameType::Skins,
            Round::Wolf(_) => GameType::Wolf,
            Round::Bingo(_) => GameType::Bingo,
            Round::Bloodsome(_) => GameType::Bloodsome,
            Round::Stableford(_) => GameType::Stableford,
            Round::Banker(_) => GameType::Banker,
            Round::Vegas(_) => GameType::Vegas,
        }
    }

    pub fn compute(&self) -> RoundResult {
        match self {
            Round::Nassau(r) => RoundResult::Nassau(Nassau.compute(r)),
            Round::Skins(r) => RoundResult::Skins(Skins.compute(r)),
            Round::Wolf(r) => RoundResult::Wolf(Wolf.compute(r)),
            Round::Bingo(r) => RoundResult::Bingo(Bingo.compute(r)),
            Round::Bloodsome(r) => RoundResult::Bloodsome(Bloodsome.compute(r)),
            Round::Stableford(r) => RoundResult::Stableford(Stableford.compute(r)),
            Round::Banker(r) => RoundResult::Banker(Banker.compute(r)),
            Round::Vegas(r) => RoundResult::Vegas(Vegas.compute(r)),
        }
    }

    /// Name the players in slot order. Team games take two names per team.
    pub fn set_names(&mut self, names: &[String]) {
        let name = |i: usize| names.get(i).cloned().unwrap_or_default();
        let team = |t: usize| Team {
            first: name(2 * t),
            second: name(2 * t + 1),
        };
        match self {
            Round::Bloodsome(r) => r.teams = [team(0), team(1)],
            Round::Vegas(r) => r.teams = [team(0), team(1)],
            Round::Nassau(r) => r.players = (0..2).map(name).collect(),
            Round::Skins(r) => r.players = (0..4).map(name).collect(),
            Round::Wolf(r) => r.players = (0..4).map(name).collect(),
            Round::Bingo(r) => r.players = (0..4).map(name).collect(),
            Round::Stableford(r) => r.players = (0..4).map(name).collect(),
            Round::Banker(r) => r.players = (0..4).map(name).collect(),
        }
    }

    fn score_rows_mut(&mut self) -> Option<&mut [PerHole<Score>]> {
        match self {
            Round::Nassau(r) => Some(r.scores.as_mut_slice()),
            Round::Skins(r) => Some(r.scores.as_mut_slice()),
            Round::Wolf(r) => Some(r.scores.as_mut_slice()),
            Round::Bloodsome(r) => Some(r.scores.as_mut_slice()),
            Round::Stableford(r) => Some(r.scores.as_mut_slice()),
            Round::Banker(r) => Some(r.scores.as_mut_slice()),
            Round::Vegas(r) => Some(r.scores.as_mut_slice()),
            Round::Bingo(_) => None,
        }
    }

    fn par_mut(&mut self) -> Option<&mut PerHole<Score>> {
        match self {
            Round::Nassau(r) => Some(&mut r.par),
            Round::Skins(r) => Some(&mut r.par),
            Round::Bloodsome(r) => Some(&mut r.par),
            Round::Stableford(r) => Some(&mut r.par),
            Round::Banker(r) => Some(&mut r.par),
            Round::Wolf(_) | Round::Bingo(_) | Round::Vegas(_) => None,
        }
    }

    fn par_at(&self, index: usize) -> Score {
        match self {
            Round::Nassau(r) => r.par.get(index),
            Round::Skins(r) => r.par.get(index),
            Round::Bloodsome(r) => r.par.get(index),
            Round::Stableford(r) => r.par.get(index),
            Round::Banker(r) => r.par.get(index),
            Round::Wolf(_) | Round::Bingo(_) | Round::Vegas(_) => None,
        }
    }

    /// Record strokes for a 1-based player (team in Bloodsome) on a 1-based hole.
    ///
    /// Implausible scores for the hole's par are kept and logged.
    pub fn set_score(&mut self, player: usize, hole: usize, score: Score) -> Result<(), EditError> {
        let game = self.game_type();
        let index = check_hole(hole)?;
        if let Some(strokes) = score {
            match validate_score(i32::from(strokes), self.par_at(index)) {
                ScoreCheck::Invalid(message) => return Err(EditError::InvalidScore(message)),
                ScoreCheck::Warn(message) => tracing::warn!(hole, strokes, "{message}"),
                ScoreCheck::Ok => {},
            }
        }
        let rows = self.score_rows_mut().ok_or(EditError::NotApplicable {
            game,
            input: "score",
        })?;
        let slot = check_slot(player, rows.len())?;
        rows[slot].set(index, score);
        Ok(())
    }

    /// Set par for a 1-based hole. Par must lie in `1..=MAX_STROKES`.
    pub fn set_par(&mut self, hole: usize, par: Score) -> Result<(), EditError> {
        let game = self.game_type();
        let index = check_hole(hole)?;
        if let Some(par) = par
            && !is_recordable(par)
        {
            return Err(EditError::InvalidScore(format!(
                "Par must be between 1 and {MAX_STROKES}, got {par}"
            )));
        }
        let row = self
            .par_mut()
            .ok_or(EditError::NotApplicable { game, input: "par" })?;
        row.set(index, par);
        Ok(())
    }

    /// Record the wolf's decision on a hole.
    pub fn select(&mut self, hole: usize, choice: WolfChoice) -> Result<(), EditError> {
        let index = check_hole(hole)?;
        match self {
            Round::Wolf(r) => {
                if let WolfChoice::Partner(partner) = choice {
                    check_slot(partner.saturating_add(1), fairway_wolf::PLAYERS)?;
                }
                r.selections.set(index, choice);
                Ok(())
            },
            other => Err(EditError::NotApplicable {
                game: other.game_type(),
                input: "wolf selection",
            }),
        }
    }

    /// Give a Bingo-Bango-Bongo mark to a 1-based player, or clear it with `None`.
    pub fn mark(&mut self, hole: usize, mark: Mark, player: Option<usize>) -> Result<(), EditError> {
        let index = check_hole(hole)?;
        match self {
            Round::Bingo(r) => {
                match player {
                    Some(p) => r.award(index, mark, check_slot(p, fairway_bingo::PLAYERS)?),
                    None => r.clear(index, mark),
                }
                Ok(())
            },
            other => Err(EditError::NotApplicable {
                game: other.game_type(),
                input: "mark",
            }),
        }
    }

    /// Choose which drive a 1-based Bloodsome team plays on a hole.
    pub fn drive(&mut self, team: usize, hole: usize, drive: Drive) -> Result<(), EditError> {
        let index = check_hole(hole)?;
        match self {
            Round::Bloodsome(r) => {
                let team = check_slot(team, 2)?;
                r.drives[team].set(index, drive);
                Ok(())
            },
            other => Err(EditError::NotApplicable {
                game: other.game_type(),
                input: "drive",
            }),
        }
    }

    /// Elect a 1-based banker for a hole; `None` returns it to the rotation.
    pub fn banker(&mut self, hole: usize, banker: Option<u8>) -> Result<(), EditError> {
        let index = check_hole(hole)?;
        match self {
            Round::Banker(r) => {
                if let Some(slot) = banker {
                    check_slot(usize::from(slot), fairway_banker::PLAYERS)?;
                }
                r.bankers.set(index, banker);
                Ok(())
            },
            other => Err(EditError::NotApplicable {
                game: other.game_type(),
                input: "banker",
            }),
        }
    }
}

/// The active round together with its latest result.
///
/// Every mutation goes through a method that recomputes, so `result` always
/// matches `round`.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundState {
    round: Round,
    result: RoundResult,
}

impl RoundState {
    pub fn new(game: GameType) -> Self {
        Self::from_round(Round::new(game))
    }

    pub fn from_round(round: Round) -> Self {
        let result = round.compute();
        let mut state = Self { round, result };
        state.merge_auto_presses();
        state
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn result(&self) -> &RoundResult {
        &self.result
    }

    pub fn game_type(&self) -> GameType {
        self.round.game_type()
    }

    pub fn recompute(&mut self) {
        self.result = self.round.compute();
        self.merge_auto_presses();
    }

    /// Keep presses the engine opened automatically so they survive a reload.
    fn merge_auto_presses(&mut self) {
        let (Round::Nassau(round), RoundResult::Nassau(result)) = (&mut self.round, &self.result)
        else {
            return;
        };
        if result.auto_presses.is_empty() {
            return;
        }
        round.presses.extend(result.auto_presses.iter().copied());
        self.result = self.round.compute();
    }

    /// Apply an edit and recompute. A rejected edit leaves the round untouched.
    pub fn edit(
        &mut self,
        change: impl FnOnce(&mut Round) -> Result<(), EditError>,
    ) -> Result<(), EditError> {
        let mut round = self.round.clone();
        change(&mut round)?;
        self.round = round;
        self.recompute();
        tracing::debug!(game = %self.game_type(), "round edited");
        Ok(())
    }

    /// Manual press for `side` at the current hole.
    pub fn request_press(&mut self, side: Side) -> Result<Press, PressRejected> {
        let game = self.game_type();
        let Round::Nassau(round) = &mut self.round else {
            tracing::warn!(%game, "press requested outside Nassau");
            return Err(PressRejected::NotNassau);
        };
        let press = round.request_press(side)?;
        self.recompute();
        Ok(press)
    }

    /// One line for sharing, e.g. `"Nassau Game Results: Bo owes Ann $10.00"`.
    pub fn summary_line(&self) -> String {
        format!(
            "{} Game Results: {}",
            self.game_type().title(),
            self.result.settlement().summary
        )
    }
}
