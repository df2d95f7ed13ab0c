//! The lockstep session
//!
//! Two state snapshots drive the match. `committed` only advances when a
//! local/remote intent pair for the same tick is available; `dirty` is a
//! throwaway clone of `committed` replayed with the not-yet-acknowledged
//! local intents, pairing each with the last intent the remote sent.
//! Rendering reads `dirty`; the protocol only ever trusts `committed`.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::input::{apply_player_intents, Intent};
use crate::net::packets::{Packet, PacketError};
use crate::net::{DataChannel, TransportError};
use crate::render::{Assets, RenderNode};
use crate::state::entity::{Entity, EntityId};
use crate::state::geom::{Side, TilePos, Ticks};
use crate::state::State;
use crate::util::ringbuf::{RingBuf, RingBufError};
use crate::util::time::unix_micros;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    #[error("malformed packet: {0}")]
    Packet(#[from] PacketError),

    #[error("desynchronized: expected intent for tick {expected}, got tick {got}")]
    Desync { expected: u32, got: u32 },

    #[error("intent ring error: {0}")]
    Ring(#[from] RingBufError),
}

/// Starting HP for both fighters
const STARTING_HP: i32 = 1000;
/// Ticks of held charge needed for a power shot
const POWER_SHOT_CHARGE_TIME: Ticks = 50;

/// Build the starting world: one fighter per side facing each other across
/// the center line.
pub fn new_arena(seed: u64) -> (State, EntityId, EntityId) {
    let mut state = State::new(seed);

    let offerer_entity_id = state.add_entity(Entity {
        hp: STARTING_HP,
        max_hp: STARTING_HP,
        display_hp: STARTING_HP,
        power_shot_charge_time: POWER_SHOT_CHARGE_TIME,
        side: Side::Offerer,
        tile_pos: TilePos::new(2, 2),
        future_tile_pos: TilePos::new(2, 2),
        ..Entity::default()
    });

    let answerer_entity_id = state.add_entity(Entity {
        hp: STARTING_HP,
        max_hp: STARTING_HP,
        display_hp: STARTING_HP,
        power_shot_charge_time: POWER_SHOT_CHARGE_TIME,
        side: Side::Answerer,
        is_flipped: true,
        tile_pos: TilePos::new(5, 2),
        future_tile_pos: TilePos::new(5, 2),
        ..Entity::default()
    });

    (state, offerer_entity_id, answerer_entity_id)
}

/// The committed/dirty state pair plus the pending-intent rings. Pure and
/// synchronous; `Session` wraps it with the I/O tasks.
pub struct Lockstep {
    side: Side,
    offerer_entity_id: EntityId,
    answerer_entity_id: EntityId,

    committed: State,
    dirty: State,

    last_incoming_intent: Intent,

    incoming: RingBuf<Intent>,
    outgoing: RingBuf<Intent>,
}

impl Lockstep {
    pub fn new(side: Side, config: &Config) -> Self {
        let (state, offerer_entity_id, answerer_entity_id) = new_arena(config.seed);
        Self {
            side,
            offerer_entity_id,
            answerer_entity_id,
            dirty: state.clone(),
            committed: state,
            last_incoming_intent: Intent::default(),
            incoming: RingBuf::new(config.max_pending_intents),
            outgoing: RingBuf::new(config.max_pending_intents),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn committed(&self) -> &State {
        &self.committed
    }

    /// The speculative state rendering should read
    pub fn dirty(&self) -> &State {
        &self.dirty
    }

    pub fn offerer_entity_id(&self) -> EntityId {
        self.offerer_entity_id
    }

    pub fn answerer_entity_id(&self) -> EntityId {
        self.answerer_entity_id
    }

    pub fn outgoing_used(&self) -> usize {
        self.outgoing.used()
    }

    pub fn incoming_used(&self) -> usize {
        self.incoming.used()
    }

    /// The tick the next remote intent must be labeled with
    pub fn expected_incoming_tick(&self) -> u32 {
        (self.committed.elapsed_time() + self.incoming.used() as Ticks + 1) as u32
    }

    /// The tick the next local intent will be labeled with
    pub fn next_outgoing_tick(&self) -> u32 {
        (self.dirty.elapsed_time() + 1) as u32
    }

    pub fn push_outgoing(&mut self, intent: Intent) -> Result<(), RingBufError> {
        self.outgoing.push(&[intent])
    }

    pub fn push_incoming(&mut self, intent: Intent) -> Result<(), RingBufError> {
        self.incoming.push(&[intent])
    }

    /// Pair one local and one remote intent according to which side we are
    fn pair(&self, ours: Intent, theirs: Intent) -> (Intent, Intent) {
        match self.side {
            Side::Offerer => (ours, theirs),
            Side::Answerer => (theirs, ours),
        }
    }

    /// Drain every matched intent pair into `committed`, then rebuild
    /// `dirty` by replaying the remaining local intents against the last
    /// known remote intent.
    pub fn fast_forward(&mut self) -> Result<(), RingBufError> {
        let n = self.outgoing.used().min(self.incoming.used());

        let mut ours = vec![Intent::default(); self.outgoing.used()];
        self.outgoing.peek(&mut ours, 0)?;
        self.outgoing.advance(n)?;

        let mut theirs = vec![Intent::default(); n];
        self.incoming.peek(&mut theirs, 0)?;
        self.incoming.advance(n)?;

        for i in 0..n {
            let (offerer_intent, answerer_intent) = self.pair(ours[i], theirs[i]);
            self.last_incoming_intent = theirs[i];

            self.committed.step();
            apply_player_intents(
                &mut self.committed,
                self.offerer_entity_id,
                offerer_intent,
                self.answerer_entity_id,
                answerer_intent,
            );
        }

        self.dirty = self.committed.clone();
        for &intent in &ours[n..] {
            let (offerer_intent, answerer_intent) = self.pair(intent, self.last_incoming_intent);

            self.dirty.step();
            apply_player_intents(
                &mut self.dirty,
                self.offerer_entity_id,
                offerer_intent,
                self.answerer_entity_id,
                answerer_intent,
            );
        }

        Ok(())
    }
}

/// A live netplay session: the lockstep core behind a lock, the RTT sample
/// window, and the background tasks that feed them.
pub struct Session {
    channel: DataChannel,
    config: Config,
    lockstep: Mutex<Lockstep>,
    delays: RwLock<RingBuf<Duration>>,
}

impl Session {
    pub fn new(channel: DataChannel, config: Config, side: Side) -> Self {
        let lockstep = Lockstep::new(side, &config);
        let delays = RingBuf::new(config.delays_window_size);
        Self {
            channel,
            config,
            lockstep: Mutex::new(lockstep),
            delays: RwLock::new(delays),
        }
    }

    /// Run the receiver and the pinger until the channel dies or the
    /// protocol fails. The first error cancels the other task and ends the
    /// session.
    pub async fn run_background_tasks(&self) -> Result<(), SessionError> {
        let side = self.lockstep.lock().await.side();
        info!(?side, "session started");
        tokio::try_join!(self.handle_conn(), self.send_pings())?;
        Ok(())
    }

    async fn send_pings(&self) -> Result<(), SessionError> {
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        loop {
            ticker.tick().await;
            self.channel
                .send(Packet::Ping { id: unix_micros() }.encode())
                .await?;
        }
    }

    async fn handle_conn(&self) -> Result<(), SessionError> {
        loop {
            let frame = self.channel.recv().await?;
            match Packet::decode(&frame)? {
                Packet::Ping { id } => {
                    self.channel.send(Packet::Pong { id }.encode()).await?;
                }
                Packet::Pong { id } => {
                    let delay = Duration::from_micros(unix_micros().saturating_sub(id));
                    debug!(rtt_micros = delay.as_micros() as u64, "pong received");

                    let mut delays = self.delays.write().await;
                    if delays.free() == 0 {
                        delays.advance(1)?;
                    }
                    delays.push(&[delay])?;
                }
                Packet::Intent { for_tick, intent } => {
                    let mut lockstep = self.lockstep.lock().await;

                    let expected = lockstep.expected_incoming_tick();
                    if for_tick != expected {
                        warn!(expected, got = for_tick, "remote intent out of sequence");
                        return Err(SessionError::Desync {
                            expected,
                            got: for_tick,
                        });
                    }

                    lockstep.push_incoming(intent)?;
                    lockstep.fast_forward()?;
                }
            }
        }
    }

    /// The 60 Hz entry point. Sends the local intent, queues it, and fast
    /// forwards. Returns false without doing anything when backpressure is
    /// holding the simulation back to roughly half the round trip.
    pub async fn update(&self, intent: Intent) -> Result<bool, SessionError> {
        let mut lockstep = self.lockstep.lock().await;

        let median = self.median_delay().await;
        let median_ticks =
            median.as_micros() as u64 * self.config.ticks_per_second as u64 / 1_000_000;
        if lockstep.outgoing_used() >= (median_ticks / 2 + 1) as usize {
            return Ok(false);
        }

        let for_tick = lockstep.next_outgoing_tick();
        self.channel
            .send(Packet::Intent { for_tick, intent }.encode())
            .await?;

        lockstep.push_outgoing(intent)?;
        lockstep.fast_forward()?;
        Ok(true)
    }

    /// Median of the rolling RTT window; zero until the first pong
    async fn median_delay(&self) -> Duration {
        let delays = self.delays.read().await;
        if delays.used() == 0 {
            return Duration::ZERO;
        }

        let mut window = vec![Duration::ZERO; delays.used()];
        if delays.peek(&mut window, 0).is_err() {
            return Duration::ZERO;
        }

        let mid = window.len() / 2;
        let (_, median, _) = window.select_nth_unstable(mid);
        *median
    }

    pub async fn committed_elapsed(&self) -> Ticks {
        self.lockstep.lock().await.committed().elapsed_time()
    }

    pub async fn dirty_elapsed(&self) -> Ticks {
        self.lockstep.lock().await.dirty().elapsed_time()
    }

    /// Read the speculative state, e.g. to drive rendering
    pub async fn with_dirty<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        let lockstep = self.lockstep.lock().await;
        f(lockstep.dirty())
    }

    /// Read the confirmed state
    pub async fn with_committed<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        let lockstep = self.lockstep.lock().await;
        f(lockstep.committed())
    }

    /// Scene description of the dirty state
    pub async fn appearance(&self, assets: &Assets) -> RenderNode {
        let lockstep = self.lockstep.lock().await;
        lockstep.dirty().appearance(assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replay `pairs` in one shot against a fresh committed state
    fn replay(side: Side, config: &Config, pairs: &[(Intent, Intent)]) -> Lockstep {
        let mut ls = Lockstep::new(side, config);
        for &(ours, theirs) in pairs {
            ls.push_outgoing(ours).unwrap();
            ls.push_incoming(theirs).unwrap();
            ls.fast_forward().unwrap();
        }
        ls
    }

    #[test]
    fn fast_forward_advances_only_matched_pairs() {
        let config = Config::default();
        let mut ls = Lockstep::new(Side::Offerer, &config);

        for _ in 0..5 {
            ls.push_outgoing(Intent::default()).unwrap();
            ls.fast_forward().unwrap();
        }

        assert_eq!(ls.committed().elapsed_time(), 0, "no remote intents yet");
        assert_eq!(ls.dirty().elapsed_time(), 5, "locals replayed speculatively");
        assert_eq!(ls.outgoing_used(), 5);

        for _ in 0..5 {
            ls.push_incoming(Intent::default()).unwrap();
        }
        ls.fast_forward().unwrap();

        assert_eq!(ls.committed().elapsed_time(), 5);
        assert_eq!(ls.dirty().elapsed_time(), 5);
        assert_eq!(ls.outgoing_used(), 0);
        assert_eq!(ls.incoming_used(), 0);
    }

    #[test]
    fn rollback_reconverges_with_one_shot_replay() {
        let config = Config::default();

        let locals: Vec<Intent> = (0..5)
            .map(|i| Intent {
                charge_basic_weapon: i % 2 == 0,
                ..Intent::default()
            })
            .collect();
        let remotes: Vec<Intent> = (0..5)
            .map(|i| Intent {
                use_chip: i % 3 == 0,
                ..Intent::default()
            })
            .collect();

        // Interleaved: all locals first, then remotes trickle in.
        let mut interleaved = Lockstep::new(Side::Offerer, &config);
        for &local in &locals {
            interleaved.push_outgoing(local).unwrap();
            interleaved.fast_forward().unwrap();
        }
        for &remote in &remotes {
            interleaved.push_incoming(remote).unwrap();
            interleaved.fast_forward().unwrap();
        }

        let pairs: Vec<(Intent, Intent)> = locals
            .iter()
            .copied()
            .zip(remotes.iter().copied())
            .collect();
        let oneshot = replay(Side::Offerer, &config, &pairs);

        assert_eq!(interleaved.committed(), oneshot.committed());
    }

    #[test]
    fn both_peers_compute_the_same_committed_state() {
        let config = Config::default();

        let offerer_stream: Vec<Intent> = (0..20)
            .map(|i| Intent {
                charge_basic_weapon: i > 2,
                ..Intent::default()
            })
            .collect();
        let answerer_stream: Vec<Intent> = (0..20).map(|_| Intent::default()).collect();

        let mut offerer = Lockstep::new(Side::Offerer, &config);
        let mut answerer = Lockstep::new(Side::Answerer, &config);

        for i in 0..20 {
            offerer.push_outgoing(offerer_stream[i]).unwrap();
            offerer.push_incoming(answerer_stream[i]).unwrap();
            offerer.fast_forward().unwrap();

            answerer.push_outgoing(answerer_stream[i]).unwrap();
            answerer.push_incoming(offerer_stream[i]).unwrap();
            answerer.fast_forward().unwrap();
        }

        assert_eq!(offerer.committed(), answerer.committed());
    }

    #[test]
    fn expected_incoming_tick_counts_queued_intents() {
        let config = Config::default();
        let mut ls = Lockstep::new(Side::Offerer, &config);
        assert_eq!(ls.expected_incoming_tick(), 1);

        ls.push_incoming(Intent::default()).unwrap();
        assert_eq!(ls.expected_incoming_tick(), 2);
    }
}
