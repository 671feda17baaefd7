use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::board::{Color, GameEvent, GameOutcome, Input, Move};
use crate::error::{ProtocolViolation, SessionError};
use crate::grid::Grid;
use crate::net::message::Message;
use crate::win::check_win;

/// How long a client waits for the host to accept the connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// How often the host checks for cancellation while waiting for a client.
const ACCEPT_POLL: Duration = Duration::from_millis(20);
/// The longest line accepted from the peer, delimiter included.
pub const MAX_LINE_LEN: u64 = 256;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    /// Listens, sends the board dimension and plays Yellow.
    Host,
    /// Connects, adopts the host's board dimension and plays Red.
    Client,
}

impl Role {
    pub fn local_color(self) -> Color {
        match self {
            Role::Host => Color::Yellow,
            Role::Client => Color::Red,
        }
    }
}

/// Why a session terminated.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SessionEnd {
    /// The local player completed a line.
    Won,
    /// The opponent reported its win, with the text it sent.
    Lost(String),
    /// The grid filled up without a winner.
    Draw,
    ConnectionLost(String),
    ProtocolViolation(ProtocolViolation),
    /// Closed locally.
    Aborted,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SessionEvent {
    /// The handshake completed, the grid is now `size x size`.
    Connected { size: usize, local_color: Color },
    Game(GameEvent),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Phase {
    Connecting,
    Playing { local_turn: bool },
    /// The opponent's last move completed a line, its game over message is authoritative.
    AwaitingVerdict,
    Terminated(GameOutcome),
}

/// Values handed from the listener thread to the control context.
#[derive(Debug)]
enum Inbound {
    Connected { size: usize, stream: Option<TcpStream> },
    Message(Message),
    Violation(ProtocolViolation),
    Disconnected(String),
}

/// One side of a networked game.
///
/// All game state is owned by this value and only mutated through `&mut self`,
/// which makes the owning thread the single writer. A background listener thread does the blocking socket
/// reads and hands decoded messages over a channel, they are applied by [NetworkSession::poll]
/// and [NetworkSession::wait_event].
#[derive(Debug)]
pub struct NetworkSession {
    role: Role,
    username: String,
    grid: Grid,
    phase: Phase,
    end: Option<SessionEnd>,

    stream: Option<TcpStream>,
    local_addr: SocketAddr,
    inbound: Receiver<Inbound>,
    cancelled: Arc<AtomicBool>,
    listener: Option<JoinHandle<()>>,
}

impl NetworkSession {
    /// Listen on `addr` and host a `size x size` game.
    /// Binding happens immediately, the single client is accepted in the background.
    pub fn host(addr: impl ToSocketAddrs, size: usize, username: &str) -> Result<Self, SessionError> {
        let grid = Grid::square(size)?;
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;
        let local_addr = listener.local_addr()?;
        log::info!("hosting a {0}x{0} game on {1}", size, local_addr);

        let (sender, inbound) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));

        let thread_cancelled = Arc::clone(&cancelled);
        let handle = thread::Builder::new()
            .name("connect4-host".to_string())
            .spawn(move || host_thread(listener, size, thread_cancelled, sender))?;

        Ok(NetworkSession {
            role: Role::Host,
            username: username.to_owned(),
            grid,
            phase: Phase::Connecting,
            end: None,
            stream: None,
            local_addr,
            inbound,
            cancelled,
            listener: Some(handle),
        })
    }

    /// Connect to the host at `addr`.
    /// `requested_size` is only used until the host's dimension arrives.
    pub fn join(addr: SocketAddr, requested_size: usize, username: &str) -> Result<Self, SessionError> {
        let grid = Grid::square(requested_size)?;
        let stream = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT)?;
        let local_addr = stream.local_addr()?;
        let reader = BufReader::new(stream.try_clone()?);
        log::info!("connected to {} from {}", addr, local_addr);

        let (sender, inbound) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("connect4-client".to_string())
            .spawn(move || client_thread(reader, sender))?;

        Ok(NetworkSession {
            role: Role::Client,
            username: username.to_owned(),
            grid,
            phase: Phase::Connecting,
            end: None,
            stream: Some(stream),
            local_addr,
            inbound,
            cancelled: Arc::new(AtomicBool::new(false)),
            listener: Some(handle),
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn local_color(&self) -> Color {
        self.role.local_color()
    }

    pub fn remote_color(&self) -> Color {
        self.local_color().other()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The address the host listens on, or the client's local address.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.phase, Phase::Playing { .. } | Phase::AwaitingVerdict)
    }

    pub fn is_local_turn(&self) -> bool {
        self.phase == Phase::Playing { local_turn: true }
    }

    pub fn is_remote_turn(&self) -> bool {
        self.phase == Phase::Playing { local_turn: false }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.phase, Phase::Terminated(_))
    }

    pub fn outcome(&self) -> GameOutcome {
        match self.phase {
            Phase::Terminated(outcome) => outcome,
            _ => GameOutcome::InProgress,
        }
    }

    /// Why the session ended, `None` while it is still running.
    pub fn end_reason(&self) -> Option<&SessionEnd> {
        self.end.as_ref()
    }

    pub fn handle(&mut self, input: Input) -> Result<Vec<SessionEvent>, SessionError> {
        match input {
            Input::ColumnSelected(column) => self.select_column(column),
            Input::Abort => Ok(self.close()),
        }
    }

    /// Play `column` for the local player and send it to the opponent.
    ///
    /// A full or invalid column is rejected without changing anything.
    pub fn select_column(&mut self, column: usize) -> Result<Vec<SessionEvent>, SessionError> {
        match self.phase {
            Phase::Connecting => return Err(SessionError::NotConnected),
            Phase::Terminated(_) => return Err(SessionError::Terminated),
            Phase::Playing { local_turn: true } => {}
            Phase::Playing { local_turn: false } | Phase::AwaitingVerdict => return Err(SessionError::NotYourTurn),
        }

        let color = self.local_color();
        let row = self.grid.apply_move(column, color)?;
        let mut events = vec![SessionEvent::Game(GameEvent::BoardChanged {
            mv: Move::new(column, color),
            row,
        })];
        log::debug!("local {} played column {} (row {})", color, column, row);

        // the move is sent even when it wins, the opponent replays it before the verdict
        if let Err(e) = self.send(&Message::Move(column)) {
            log::warn!("failed to send move: {}", e);
            events.extend(self.terminate(GameOutcome::Disconnected, SessionEnd::ConnectionLost(e.to_string())));
            return Ok(events);
        }

        if check_win(&self.grid, row, column, color) {
            let verdict = Message::game_over(&format!("{} Win", self.username));
            if let Err(e) = self.send(&verdict) {
                log::warn!("failed to send game over: {}", e);
            }
            events.extend(self.terminate(GameOutcome::Win(color), SessionEnd::Won));
        } else if self.grid.is_full() {
            events.extend(self.terminate(GameOutcome::Draw, SessionEnd::Draw));
        } else {
            self.phase = Phase::Playing { local_turn: false };
            events.push(SessionEvent::Game(GameEvent::TurnChanged(self.remote_color())));
        }

        Ok(events)
    }

    /// Apply everything the listener has handed over so far, without blocking.
    pub fn poll(&mut self) -> Vec<SessionEvent> {
        let mut events = vec![];
        loop {
            match self.inbound.try_recv() {
                Ok(inbound) => events.extend(self.apply(inbound)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    events.extend(self.listener_gone());
                    break;
                }
            }
        }
        events
    }

    /// Wait up to `timeout` for the listener to hand something over, then apply it and anything queued behind it.
    /// Returns immediately once the session has terminated.
    pub fn wait_event(&mut self, timeout: Duration) -> Vec<SessionEvent> {
        if self.is_terminated() {
            return vec![];
        }

        let mut events = match self.inbound.recv_timeout(timeout) {
            Ok(inbound) => self.apply(inbound),
            Err(RecvTimeoutError::Timeout) => return vec![],
            Err(RecvTimeoutError::Disconnected) => return self.listener_gone(),
        };
        events.extend(self.poll());
        events
    }

    /// Close the connection and end the session. Safe to call any number of times.
    pub fn close(&mut self) -> Vec<SessionEvent> {
        self.terminate(GameOutcome::Disconnected, SessionEnd::Aborted)
    }

    fn apply(&mut self, inbound: Inbound) -> Vec<SessionEvent> {
        if self.is_terminated() {
            log::trace!("dropping {:?} after termination", inbound);
            if let Inbound::Connected { stream: Some(stream), .. } = inbound {
                shutdown(&stream);
            }
            return vec![];
        }

        match inbound {
            Inbound::Connected { size, stream } => self.connected(size, stream),
            Inbound::Message(Message::Move(column)) => self.remote_move(column),
            Inbound::Message(Message::GameOver(text)) => {
                log::info!("opponent reports game over: {}", text);
                self.terminate(GameOutcome::Win(self.remote_color()), SessionEnd::Lost(text))
            }
            Inbound::Message(Message::Dimension(size)) => {
                self.violation(ProtocolViolation::Malformed(Message::Dimension(size).to_string()))
            }
            Inbound::Violation(violation) => self.violation(violation),
            Inbound::Disconnected(reason) => {
                log::warn!("connection lost: {}", reason);
                self.terminate(GameOutcome::Disconnected, SessionEnd::ConnectionLost(reason))
            }
        }
    }

    fn connected(&mut self, size: usize, stream: Option<TcpStream>) -> Vec<SessionEvent> {
        if self.phase != Phase::Connecting {
            return self.violation(ProtocolViolation::MissingDimension(size.to_string()));
        }

        if size != self.grid.columns() || size != self.grid.rows() {
            match Grid::square(size) {
                Ok(grid) => self.grid = grid,
                Err(_) => return self.violation(ProtocolViolation::InvalidDimension(size)),
            }
        }
        if let Some(stream) = stream {
            self.stream = Some(stream);
        }

        let local_turn = self.role == Role::Host;
        self.phase = Phase::Playing { local_turn };
        log::info!("{:?} connected, {}x{} grid, playing {}", self.role, size, size, self.local_color());

        vec![
            SessionEvent::Connected {
                size,
                local_color: self.local_color(),
            },
            SessionEvent::Game(GameEvent::TurnChanged(Color::Yellow)),
        ]
    }

    fn remote_move(&mut self, column: usize) -> Vec<SessionEvent> {
        if self.phase != (Phase::Playing { local_turn: false }) {
            return self.violation(ProtocolViolation::OutOfTurn(column));
        }

        let color = self.remote_color();
        let row = match self.grid.apply_move(column, color) {
            Ok(row) => row,
            Err(e) => return self.violation(ProtocolViolation::IllegalMove(e)),
        };
        log::debug!("remote {} played column {} (row {})", color, column, row);

        let mut events = vec![SessionEvent::Game(GameEvent::BoardChanged {
            mv: Move::new(column, color),
            row,
        })];

        if check_win(&self.grid, row, column, color) {
            log::debug!("remote move completes a line, waiting for its game over message");
            self.phase = Phase::AwaitingVerdict;
        } else if self.grid.is_full() {
            events.extend(self.terminate(GameOutcome::Draw, SessionEnd::Draw));
        } else {
            self.phase = Phase::Playing { local_turn: true };
            events.push(SessionEvent::Game(GameEvent::TurnChanged(self.local_color())));
        }

        events
    }

    fn violation(&mut self, violation: ProtocolViolation) -> Vec<SessionEvent> {
        log::warn!("protocol violation: {}", violation);
        self.terminate(GameOutcome::Disconnected, SessionEnd::ProtocolViolation(violation))
    }

    fn listener_gone(&mut self) -> Vec<SessionEvent> {
        self.terminate(
            GameOutcome::Disconnected,
            SessionEnd::ConnectionLost("listener stopped".to_string()),
        )
    }

    /// The single exit path, emits the end event at most once.
    fn terminate(&mut self, outcome: GameOutcome, reason: SessionEnd) -> Vec<SessionEvent> {
        if self.is_terminated() {
            return vec![];
        }

        log::info!("session ended: {} ({:?})", outcome, reason);
        self.phase = Phase::Terminated(outcome);
        self.end = Some(reason);
        self.release();

        vec![SessionEvent::Game(GameEvent::GameEnded(outcome))]
    }

    /// Shut the socket down, which unblocks the listener's pending read.
    fn release(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);

        if let Some(stream) = self.stream.take() {
            shutdown(&stream);
        }

        // a host stream that was accepted but not handed over yet
        while let Ok(inbound) = self.inbound.try_recv() {
            if let Inbound::Connected { stream: Some(stream), .. } = inbound {
                shutdown(&stream);
            }
        }
    }

    fn send(&mut self, message: &Message) -> std::io::Result<()> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| std::io::Error::new(ErrorKind::NotConnected, "no connection"))?;
        stream.write_all(message.to_line().as_bytes())?;
        stream.flush()
    }
}

impl Drop for NetworkSession {
    fn drop(&mut self) {
        self.release();
        if let Some(handle) = self.listener.take() {
            if handle.join().is_err() {
                log::error!("listener thread panicked");
            }
        }
    }
}

fn shutdown(stream: &TcpStream) {
    if let Err(e) = stream.shutdown(Shutdown::Both) {
        if e.kind() != ErrorKind::NotConnected {
            log::debug!("shutdown failed: {}", e);
        }
    }
}

fn host_thread(listener: TcpListener, size: usize, cancelled: Arc<AtomicBool>, sender: Sender<Inbound>) {
    let (stream, peer) = loop {
        if cancelled.load(Ordering::SeqCst) {
            return;
        }
        match listener.accept() {
            Ok(pair) => break pair,
            Err(e) if e.kind() == ErrorKind::WouldBlock => thread::sleep(ACCEPT_POLL),
            Err(e) => {
                let _ = sender.send(Inbound::Disconnected(e.to_string()));
                return;
            }
        }
    };
    drop(listener);
    log::info!("accepted {}", peer);

    let handshake = || -> std::io::Result<(TcpStream, BufReader<TcpStream>)> {
        stream.set_nonblocking(false)?;
        (&stream).write_all(Message::Dimension(size).to_line().as_bytes())?;
        Ok((stream.try_clone()?, BufReader::new(stream.try_clone()?)))
    };
    let (writer, reader) = match handshake() {
        Ok(halves) => halves,
        Err(e) => {
            let _ = sender.send(Inbound::Disconnected(e.to_string()));
            return;
        }
    };

    let connected = Inbound::Connected {
        size,
        stream: Some(writer),
    };
    if sender.send(connected).is_err() {
        return;
    }
    // closed between the hand-off and now, nobody else will unblock the read
    if cancelled.load(Ordering::SeqCst) {
        shutdown(&stream);
        return;
    }
    drop(stream);

    receive_loop(reader, &sender);
}

fn client_thread(mut reader: BufReader<TcpStream>, sender: Sender<Inbound>) {
    let mut line = String::new();
    let inbound = match read_frame(&mut reader, &mut line) {
        Ok(()) => match Message::parse_dimension(&line) {
            Ok(size) if (Grid::MIN_SIZE..=Grid::MAX_SIZE).contains(&size) => Inbound::Connected { size, stream: None },
            Ok(size) => Inbound::Violation(ProtocolViolation::InvalidDimension(size)),
            Err(violation) => Inbound::Violation(violation),
        },
        Err(inbound) => inbound,
    };

    let proceed = matches!(inbound, Inbound::Connected { .. });
    if sender.send(inbound).is_err() || !proceed {
        return;
    }

    receive_loop(reader, &sender);
}

/// Read lines until the connection ends, the peer reports game over or sends garbage.
fn receive_loop(mut reader: BufReader<TcpStream>, sender: &Sender<Inbound>) {
    let mut line = String::new();
    loop {
        let inbound = match read_frame(&mut reader, &mut line) {
            Ok(()) => match Message::parse(&line) {
                Ok(message) => Inbound::Message(message),
                Err(violation) => Inbound::Violation(violation),
            },
            Err(inbound) => inbound,
        };

        let keep_going = matches!(inbound, Inbound::Message(Message::Move(_)));
        if sender.send(inbound).is_err() || !keep_going {
            return;
        }
    }
}

/// Read the next line into `line`. On failure, returns what to hand over instead.
fn read_frame(reader: &mut BufReader<TcpStream>, line: &mut String) -> Result<(), Inbound> {
    line.clear();
    match (&mut *reader).take(MAX_LINE_LEN).read_line(line) {
        Ok(0) => Err(Inbound::Disconnected("connection closed by peer".to_string())),
        Ok(n) if n as u64 == MAX_LINE_LEN && !line.ends_with('\n') => Err(Inbound::Violation(
            ProtocolViolation::Malformed(format!("line longer than {} bytes", MAX_LINE_LEN)),
        )),
        Ok(_) => Ok(()),
        Err(e) => Err(read_error(e)),
    }
}

fn read_error(e: std::io::Error) -> Inbound {
    if e.kind() == ErrorKind::InvalidData {
        Inbound::Violation(ProtocolViolation::Malformed("<invalid utf-8>".to_string()))
    } else {
        Inbound::Disconnected(e.to_string())
    }
}
