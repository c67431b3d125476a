//! The room actor (§5 "single-writer per room"). Every mutation of a
//! room's seats, its Deal Engine, and its Match Controller happens on one
//! task; commands arrive serialised over an mpsc queue. Timers (inter-deal
//! grace, bot-turn delay) are tasks that enqueue a command back onto this
//! same queue, carrying the deal epoch they were scheduled for so a
//! force-end can invalidate them (§9).

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::api::proto::{GameStateView, HandView, ModeWire, RoomStateView, SeatView, ServerMessage};
use crate::domain::entities::{GameMode, Phase, RoomPhase, RoomState, Seat};
use crate::domain::repositories::BotStrategy;
use crate::domain::services::{deal_engine, match_controller};
use crate::domain::value_objects::CardId;
use crate::infrastructure::config::Config;
use crate::infrastructure::random::SeededRandomSource;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RoomError {
    #[error("room is full")]
    RoomFull,
    #[error("a match is already in progress")]
    MatchInProgress,
    #[error("no match is in progress")]
    NoMatch,
    #[error("only the host may do that")]
    NotHost,
    #[error("seat is not empty")]
    SeatTaken,
    #[error(transparent)]
    Deal(#[from] deal_engine::DealError),
}

type Reply<T> = oneshot::Sender<Result<T, RoomError>>;

pub enum RoomCommand {
    Join { name: String, outbox: mpsc::UnboundedSender<ServerMessage>, reply: Reply<Seat> },
    SetReady { seat: Seat, reply: Reply<()> },
    Start { seat: Seat, reply: Reply<()> },
    SwitchSeat { seat: Seat, target: Seat, reply: Reply<()> },
    SetMode { seat: Seat, mode: ModeWire, reply: Reply<()> },
    ForceEnd { seat: Seat, reply: Reply<()> },
    Disconnect { seat: Seat },
    PlayHand { seat: Seat, cards: Vec<CardId>, reply: Reply<()> },
    Pass { seat: Seat, reply: Reply<()> },
    SubmitTribute { seat: Seat, card: CardId, reply: Reply<()> },
    SubmitReturn { seat: Seat, card: CardId, reply: Reply<()> },
    Chat { seat: Seat, text: String },
    GraceTimerFired { epoch: u64 },
    BotTurnFired { epoch: u64, seat: Seat },
}

/// A cloneable front to a running `RoomActor` task.
#[derive(Clone)]
pub struct RoomHandle {
    tx: mpsc::UnboundedSender<RoomCommand>,
}

impl RoomHandle {
    async fn call<T>(&self, build: impl FnOnce(Reply<T>) -> RoomCommand) -> Result<T, RoomError> {
        let (reply, rx) = oneshot::channel();
        let _ = self.tx.send(build(reply));
        rx.await.unwrap_or(Err(RoomError::NoMatch))
    }

    pub async fn join(&self, name: String, outbox: mpsc::UnboundedSender<ServerMessage>) -> Result<Seat, RoomError> {
        self.call(|reply| RoomCommand::Join { name, outbox, reply }).await
    }

    pub async fn set_ready(&self, seat: Seat) -> Result<(), RoomError> {
        self.call(|reply| RoomCommand::SetReady { seat, reply }).await
    }

    pub async fn start(&self, seat: Seat) -> Result<(), RoomError> {
        self.call(|reply| RoomCommand::Start { seat, reply }).await
    }

    pub async fn switch_seat(&self, seat: Seat, target: Seat) -> Result<(), RoomError> {
        self.call(|reply| RoomCommand::SwitchSeat { seat, target, reply }).await
    }

    pub async fn set_mode(&self, seat: Seat, mode: ModeWire) -> Result<(), RoomError> {
        self.call(|reply| RoomCommand::SetMode { seat, mode, reply }).await
    }

    pub async fn force_end(&self, seat: Seat) -> Result<(), RoomError> {
        self.call(|reply| RoomCommand::ForceEnd { seat, reply }).await
    }

    pub fn disconnect(&self, seat: Seat) {
        let _ = self.tx.send(RoomCommand::Disconnect { seat });
    }

    pub async fn play_hand(&self, seat: Seat, cards: Vec<CardId>) -> Result<(), RoomError> {
        self.call(|reply| RoomCommand::PlayHand { seat, cards, reply }).await
    }

    pub async fn pass(&self, seat: Seat) -> Result<(), RoomError> {
        self.call(|reply| RoomCommand::Pass { seat, reply }).await
    }

    pub async fn submit_tribute(&self, seat: Seat, card: CardId) -> Result<(), RoomError> {
        self.call(|reply| RoomCommand::SubmitTribute { seat, card, reply }).await
    }

    pub async fn submit_return(&self, seat: Seat, card: CardId) -> Result<(), RoomError> {
        self.call(|reply| RoomCommand::SubmitReturn { seat, card, reply }).await
    }

    pub fn chat(&self, seat: Seat, text: String) {
        let _ = self.tx.send(RoomCommand::Chat { seat, text });
    }
}

/// Spawn a fresh room actor and return a handle to it.
pub fn spawn_room(id: Uuid, host_name: String, config: Config, bot: Arc<dyn BotStrategy>) -> RoomHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    let actor = RoomActor {
        state: RoomState::new(id, host_name),
        outboxes: Default::default(),
        rng: SeededRandomSource::from_entropy(),
        bot,
        config,
        self_tx: tx.clone(),
    };
    tokio::spawn(actor.run(rx));
    RoomHandle { tx }
}

struct RoomActor {
    state: RoomState,
    outboxes: [Option<mpsc::UnboundedSender<ServerMessage>>; 4],
    rng: SeededRandomSource,
    bot: Arc<dyn BotStrategy>,
    config: Config,
    self_tx: mpsc::UnboundedSender<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<RoomCommand>) {
        while let Some(cmd) = rx.recv().await {
            self.handle(cmd);
        }
    }

    fn handle(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join { name, outbox, reply } => {
                let result = self.join(name, outbox);
                let _ = reply.send(result);
                self.broadcast_room_state();
                self.broadcast_game_state();
            }
            RoomCommand::SetReady { seat, reply } => {
                self.state.ready[seat as usize] = true;
                let _ = reply.send(Ok(()));
                if self.state.phase == RoomPhase::Lobby && self.state.all_seats_ready() {
                    self.begin_match();
                }
                self.broadcast_room_state();
                self.broadcast_game_state();
            }
            RoomCommand::Start { seat, reply } => {
                let result = if seat != self.state.host {
                    Err(RoomError::NotHost)
                } else if self.state.phase != RoomPhase::Lobby {
                    Err(RoomError::MatchInProgress)
                } else {
                    self.begin_match();
                    Ok(())
                };
                let _ = reply.send(result);
                self.broadcast_room_state();
                self.broadcast_game_state();
            }
            RoomCommand::SwitchSeat { seat, target, reply } => {
                let result = self.switch_seat(seat, target);
                let _ = reply.send(result);
                self.broadcast_room_state();
            }
            RoomCommand::SetMode { seat, mode, reply } => {
                let result = if seat != self.state.host {
                    Err(RoomError::NotHost)
                } else {
                    self.state.mode = match mode {
                        ModeWire::Normal => GameMode::Normal,
                        ModeWire::Skill => GameMode::Skill,
                    };
                    Ok(())
                };
                let _ = reply.send(result);
                self.broadcast_room_state();
            }
            RoomCommand::ForceEnd { seat, reply } => {
                let result = if seat != self.state.host {
                    Err(RoomError::NotHost)
                } else {
                    self.force_end();
                    Ok(())
                };
                let _ = reply.send(result);
                self.broadcast_room_state();
                self.broadcast_game_state();
            }
            RoomCommand::Disconnect { seat } => {
                self.disconnect(seat);
                self.broadcast_room_state();
            }
            RoomCommand::PlayHand { seat, cards, reply } => {
                let result = self.with_deal(|deal| deal_engine::play(deal, seat, &cards).map(|_| ()));
                let _ = reply.send(result);
                self.broadcast_game_state();
            }
            RoomCommand::Pass { seat, reply } => {
                let result = self.with_deal(|deal| deal_engine::pass(deal, seat));
                let _ = reply.send(result);
                self.broadcast_game_state();
            }
            RoomCommand::SubmitTribute { seat, card, reply } => {
                let result = self.with_deal(|deal| deal_engine::submit_tribute(deal, seat, card));
                let _ = reply.send(result);
                self.broadcast_game_state();
            }
            RoomCommand::SubmitReturn { seat, card, reply } => {
                let result = self.with_deal(|deal| deal_engine::submit_return(deal, seat, card));
                let _ = reply.send(result);
                self.broadcast_game_state();
            }
            RoomCommand::Chat { seat, text } => {
                self.state.chat.push(crate::domain::entities::ChatMessage { seat, text: text.clone() });
                let sender = self.state.seats[seat as usize].name().unwrap_or("?").to_string();
                self.send_to_all(ServerMessage::ChatMessage {
                    sender,
                    text,
                    seat,
                    time: Utc::now().to_rfc3339(),
                });
            }
            RoomCommand::GraceTimerFired { epoch } => {
                if epoch == self.state.deal_epoch {
                    self.start_next_deal();
                    self.broadcast_game_state();
                }
            }
            RoomCommand::BotTurnFired { epoch, seat } => {
                if epoch == self.state.deal_epoch {
                    self.resolve_bot_turn(seat);
                    self.broadcast_game_state();
                }
            }
        }
    }

    fn join(&mut self, name: String, outbox: mpsc::UnboundedSender<ServerMessage>) -> Result<Seat, RoomError> {
        if let Some(seat) = self.state.disconnected_seat_with_name(&name) {
            self.state.seats[seat as usize] = crate::domain::entities::SeatOccupant::Human { name, connected: true };
            self.outboxes[seat as usize] = Some(outbox);
            return Ok(seat);
        }
        if self.state.phase != RoomPhase::Lobby {
            return Err(RoomError::MatchInProgress);
        }
        let seat = *self.state.empty_seats().first().ok_or(RoomError::RoomFull)?;
        self.state.seats[seat as usize] = crate::domain::entities::SeatOccupant::Human { name, connected: true };
        self.outboxes[seat as usize] = Some(outbox);
        Ok(seat)
    }

    fn switch_seat(&mut self, seat: Seat, target: Seat) -> Result<(), RoomError> {
        if self.state.phase != RoomPhase::Lobby {
            return Err(RoomError::MatchInProgress);
        }
        if !self.state.seats[target as usize].is_empty() {
            return Err(RoomError::SeatTaken);
        }
        self.state.seats.swap(seat as usize, target as usize);
        self.state.ready.swap(seat as usize, target as usize);
        self.outboxes.swap(seat as usize, target as usize);
        if self.state.host == seat {
            self.state.host = target;
        }
        Ok(())
    }

    fn disconnect(&mut self, seat: Seat) {
        if self.state.phase == RoomPhase::Lobby {
            self.state.seats[seat as usize] = crate::domain::entities::SeatOccupant::Empty;
            self.state.ready[seat as usize] = false;
        } else if let crate::domain::entities::SeatOccupant::Human { name, .. } = &self.state.seats[seat as usize] {
            let name = name.clone();
            self.state.seats[seat as usize] =
                crate::domain::entities::SeatOccupant::Human { name, connected: false };
        }
        self.outboxes[seat as usize] = None;
    }

    fn begin_match(&mut self) {
        self.state.fill_remaining_with_bots();
        self.state.phase = RoomPhase::InMatch;
        let match_state = crate::domain::entities::MatchState::new();
        self.state.bump_deal_epoch();
        let deal = match_controller::start_next_deal(&match_state, &mut self.rng);
        self.state.match_state = Some(match_state);
        self.state.deal = Some(deal);
        self.settle_after_mutation();
    }

    fn force_end(&mut self) {
        self.state.bump_deal_epoch();
        self.state.deal = None;
        self.state.match_state = None;
        self.state.phase = RoomPhase::Lobby;
        self.state.ready = [false; 4];
    }

    fn with_deal(&mut self, f: impl FnOnce(&mut crate::domain::entities::DealState) -> Result<(), deal_engine::DealError>) -> Result<(), RoomError> {
        let deal = self.state.deal.as_mut().ok_or(RoomError::NoMatch)?;
        f(deal)?;
        self.settle_after_mutation();
        Ok(())
    }

    /// Resolves bot tribute/return/play steps synchronously where the spec
    /// calls for immediate resolution, and schedules the timer-gated bot
    /// turn for Playing.
    fn settle_after_mutation(&mut self) {
        let epoch = self.state.deal_epoch;
        let is_bot = |s: Seat| self.state.seats[s as usize].is_bot();

        if let Some(deal) = self.state.deal.as_mut() {
            if deal.phase == Phase::Tribute {
                deal_engine::auto_pay_bot_tributes(deal, is_bot, self.bot.as_ref());
            }
            if deal.phase == Phase::ReturnTribute {
                deal_engine::auto_return_bot_tributes(deal, is_bot, self.bot.as_ref());
            }
        }

        let scored = matches!(&self.state.deal, Some(d) if d.phase == Phase::Score);
        if scored {
            self.on_deal_scored();
            return;
        }

        let bot_turn = self.state.deal.as_ref().and_then(|d| {
            if d.phase == Phase::Playing && d.winners.len() < 3 && is_bot(d.current_turn) {
                Some(d.current_turn)
            } else {
                None
            }
        });
        if let Some(seat) = bot_turn {
            self.schedule_bot_turn(epoch, seat);
        }
    }

    fn schedule_bot_turn(&self, epoch: u64, seat: Seat) {
        let delay = self.config.bot_turn_delay;
        let tx = self.self_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(RoomCommand::BotTurnFired { epoch, seat });
        });
    }

    fn resolve_bot_turn(&mut self, seat: Seat) {
        let Some(deal) = self.state.deal.as_mut() else { return };
        if deal.phase != Phase::Playing || deal.current_turn != seat {
            return;
        }
        let hand = deal.hands[seat as usize].clone();
        let target = deal.last_play.as_ref().map(|p| p.classification.clone());
        let decision = self.bot.decide(&hand, deal.level, target.as_ref());
        let outcome = match decision {
            crate::domain::repositories::BotDecision::Play(cards) => deal_engine::play(deal, seat, &cards).map(|_| ()),
            crate::domain::repositories::BotDecision::Pass => deal_engine::pass(deal, seat),
        };
        // A malformed bot response is treated as a pass (§4.3.5).
        if outcome.is_err() {
            let _ = deal_engine::pass(deal, seat);
        }
        self.settle_after_mutation();
    }

    fn on_deal_scored(&mut self) {
        let Some(deal) = &self.state.deal else { return };
        let winners: [Seat; 4] = [deal.winners[0], deal.winners[1], deal.winners[2], deal.winners[3]];
        self.send_to_all(ServerMessage::GameOver { winners });

        let Some(match_state) = self.state.match_state.as_mut() else { return };
        match match_controller::apply_deal_outcome(match_state, &winners) {
            match_controller::MatchOutcome::Continues => {
                let epoch = self.state.bump_deal_epoch();
                let delay = self.config.deal_grace_period;
                let tx = self.self_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(RoomCommand::GraceTimerFired { epoch });
                });
            }
            match_controller::MatchOutcome::MatchOver { winning_team, final_levels } => {
                self.send_to_all(ServerMessage::MatchOver { team: winning_team.index() as u8, levels: final_levels });
                self.state.deal = None;
                self.state.match_state = None;
                self.state.phase = RoomPhase::Lobby;
                self.state.ready = [false; 4];
            }
        }
    }

    fn start_next_deal(&mut self) {
        let Some(match_state) = self.state.match_state.as_ref() else { return };
        let deal = match_controller::start_next_deal(match_state, &mut self.rng);
        self.state.deal = Some(deal);
        self.settle_after_mutation();
    }

    fn send_to_all(&self, msg: ServerMessage) {
        for outbox in self.outboxes.iter().flatten() {
            let _ = outbox.send(msg.clone());
        }
    }

    fn broadcast_room_state(&self) {
        let view = self.room_state_view();
        self.send_to_all(ServerMessage::RoomState(view));
    }

    fn broadcast_game_state(&self) {
        for seat in 0u8..4 {
            if let (Some(outbox), Some(view)) = (&self.outboxes[seat as usize], self.game_state_view_for(seat)) {
                let _ = outbox.send(ServerMessage::GameState(view));
            }
        }
    }

    fn room_state_view(&self) -> RoomStateView {
        let seats = std::array::from_fn(|i| match &self.state.seats[i] {
            crate::domain::entities::SeatOccupant::Empty => SeatView::Empty,
            crate::domain::entities::SeatOccupant::Bot => SeatView::Bot,
            crate::domain::entities::SeatOccupant::Human { name, connected } => SeatView::Human {
                name: name.clone(),
                connected: *connected,
                ready: self.state.ready[i],
            },
        });
        RoomStateView {
            room_id: self.state.id.to_string(),
            phase: self.state.phase,
            seats,
            host: self.state.host,
            mode: match self.state.mode {
                GameMode::Normal => ModeWire::Normal,
                GameMode::Skill => ModeWire::Skill,
            },
        }
    }

    fn game_state_view_for(&self, recipient: Seat) -> Option<GameStateView> {
        let deal = self.state.deal.as_ref()?;
        let match_state = self.state.match_state.as_ref()?;
        let hands = std::array::from_fn(|i| {
            if i as Seat == recipient {
                HandView::Owned(deal.hands[i].clone())
            } else {
                HandView::Count(deal.hands[i].len())
            }
        });
        Some(GameStateView {
            phase: deal.phase,
            level: deal.level,
            current_turn: deal.current_turn,
            hands,
            last_hand: deal.last_play.as_ref().map(|p| p.classification.clone()),
            round_actions: deal.round_actions.clone(),
            winners: deal.winners.clone(),
            team_levels: match_state.team_levels,
            active_team: match_state.active_team.index() as u8,
        })
    }
}
