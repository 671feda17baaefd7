use std::time::Duration;

use connect_four::board::{Color, GameEvent, GameOutcome, Input, Move};
use connect_four::error::{MoveError, SessionError};
use connect_four::net::{NetworkSession, Role, SessionEnd, SessionEvent};

use crate::net::{connected_pair, ended_count, play, pump_until};
use crate::util::DRAW_4X4;

#[test]
fn handshake_adopts_host_size() {
    let mut host = NetworkSession::host("127.0.0.1:0", 8, "alice").unwrap();
    let mut client = NetworkSession::join(host.local_addr(), 6, "bob").unwrap();
    assert_eq!(6, client.grid().columns());

    let host_events = pump_until(&mut host, |s| s.is_connected());
    let client_events = pump_until(&mut client, |s| s.is_connected());

    assert!(host_events.contains(&SessionEvent::Connected {
        size: 8,
        local_color: Color::Yellow
    }));
    assert!(client_events.contains(&SessionEvent::Connected {
        size: 8,
        local_color: Color::Red
    }));

    assert_eq!((8, 8), (client.grid().columns(), client.grid().rows()));
    assert_eq!(Role::Host, host.role());
    assert!(host.is_local_turn());
    assert!(client.is_remote_turn());
}

#[test]
fn not_connected_yet() {
    let mut host = NetworkSession::host("127.0.0.1:0", 7, "alice").unwrap();
    assert!(matches!(host.select_column(3), Err(SessionError::NotConnected)));
    assert_eq!(0, host.grid().piece_count());
}

#[test]
fn invalid_host_size() {
    assert!(matches!(
        NetworkSession::host("127.0.0.1:0", 11, "alice"),
        Err(SessionError::Config(_))
    ));
}

#[test]
fn moves_are_mirrored() {
    let (mut host, mut client) = connected_pair(7);

    let events = play(&mut host, &mut client, 3);
    assert!(events.contains(&SessionEvent::Game(GameEvent::BoardChanged {
        mv: Move::new(3, Color::Yellow),
        row: 6
    })));
    assert!(events.contains(&SessionEvent::Game(GameEvent::TurnChanged(Color::Red))));
    assert_eq!(Some(Color::Yellow), client.grid().cell(6, 3));

    play(&mut client, &mut host, 3);
    play(&mut host, &mut client, 0);
    assert_eq!(host.grid(), client.grid());
    assert_eq!(3, host.grid().piece_count());
    assert!(client.is_local_turn());
}

#[test]
fn out_of_turn_is_rejected() {
    let (mut host, mut client) = connected_pair(7);

    assert!(matches!(client.select_column(0), Err(SessionError::NotYourTurn)));
    play(&mut host, &mut client, 0);
    assert!(matches!(host.select_column(0), Err(SessionError::NotYourTurn)));

    assert_eq!(1, client.grid().piece_count());
    assert!(!host.is_terminated());
    assert!(!client.is_terminated());
}

#[test]
fn full_column_is_rejected() {
    let (mut host, mut client) = connected_pair(4);

    play(&mut host, &mut client, 0);
    play(&mut client, &mut host, 0);
    play(&mut host, &mut client, 0);
    play(&mut client, &mut host, 0);

    let before = host.grid().clone();
    assert!(matches!(
        host.select_column(0),
        Err(SessionError::Move(MoveError::ColumnFull(0)))
    ));
    assert!(matches!(
        host.select_column(4),
        Err(SessionError::Move(MoveError::InvalidColumn(4)))
    ));
    assert_eq!(&before, host.grid());
    assert!(host.is_local_turn());

    // the session is still usable
    play(&mut host, &mut client, 1);
    assert_eq!(host.grid(), client.grid());
}

#[test]
fn win_ends_both_sides_once() {
    let (mut host, mut client) = connected_pair(7);

    let mut host_events = vec![];
    for column in 0..3 {
        host_events.extend(play(&mut host, &mut client, column));
        host_events.extend(play(&mut client, &mut host, column));
    }
    host_events.extend(host.select_column(3).unwrap());

    assert_eq!(GameOutcome::Win(Color::Yellow), host.outcome());
    assert_eq!(Some(&SessionEnd::Won), host.end_reason());

    let client_events = pump_until(&mut client, |s| s.is_terminated());
    assert_eq!(GameOutcome::Win(Color::Yellow), client.outcome());
    assert_eq!(Some(&SessionEnd::Lost("alice Win".to_string())), client.end_reason());
    assert_eq!(Some(Color::Yellow), client.grid().cell(6, 3));
    assert_eq!(host.grid(), client.grid());

    assert!(client_events.contains(&SessionEvent::Game(GameEvent::GameEnded(GameOutcome::Win(Color::Yellow)))));
    assert_eq!(1, ended_count(&client_events));

    // nothing more happens after the end, on either side
    host_events.extend(host.wait_event(Duration::from_millis(50)));
    host_events.extend(host.close());
    assert_eq!(1, ended_count(&host_events));
    assert!(matches!(client.select_column(4), Err(SessionError::Terminated)));
    assert!(client.poll().is_empty());
}

#[test]
fn draw_on_full_grid() {
    let (mut host, mut client) = connected_pair(4);

    for (i, &column) in DRAW_4X4.iter().enumerate() {
        if i % 2 == 0 {
            play(&mut host, &mut client, column);
        } else {
            play(&mut client, &mut host, column);
        }
    }

    assert_eq!(GameOutcome::Draw, host.outcome());
    assert_eq!(GameOutcome::Draw, client.outcome());
    assert_eq!(Some(&SessionEnd::Draw), host.end_reason());
    assert_eq!(Some(&SessionEnd::Draw), client.end_reason());
}

#[test]
fn peer_disconnect() {
    let (mut host, client) = connected_pair(7);
    drop(client);

    let mut events = pump_until(&mut host, |s| s.is_terminated());
    assert!(matches!(host.end_reason(), Some(SessionEnd::ConnectionLost(_))));
    assert_eq!(GameOutcome::Disconnected, host.outcome());

    events.extend(host.close());
    events.extend(host.wait_event(Duration::from_millis(10)));
    assert_eq!(1, ended_count(&events));
}

#[test]
fn close_is_idempotent() {
    let (mut host, mut client) = connected_pair(7);

    let first = host.close();
    assert_eq!(vec![SessionEvent::Game(GameEvent::GameEnded(GameOutcome::Disconnected))], first);
    assert!(host.close().is_empty());
    assert_eq!(Some(&SessionEnd::Aborted), host.end_reason());
    assert!(matches!(host.select_column(0), Err(SessionError::Terminated)));

    let events = pump_until(&mut client, |s| s.is_terminated());
    assert_eq!(1, ended_count(&events));
    assert!(matches!(client.end_reason(), Some(SessionEnd::ConnectionLost(_))));
}

#[test]
fn close_before_anyone_joins() {
    let mut host = NetworkSession::host("127.0.0.1:0", 5, "alice").unwrap();
    assert_eq!(1, ended_count(&host.close()));
    assert!(host.is_terminated());
    assert!(host.wait_event(Duration::from_millis(10)).is_empty());
}

#[test]
fn abort_while_waiting_for_client() {
    let mut host = NetworkSession::host("127.0.0.1:0", 7, "alice").unwrap();

    assert!(matches!(host.handle(Input::ColumnSelected(3)), Err(SessionError::NotConnected)));
    let events = host.handle(Input::Abort).unwrap();
    assert_eq!(vec![SessionEvent::Game(GameEvent::GameEnded(GameOutcome::Disconnected))], events);
    assert_eq!(Some(&SessionEnd::Aborted), host.end_reason());
}

#[test]
fn abort_during_opponent_turn() {
    let (mut host, mut client) = connected_pair(7);

    // a column typed early is refused, not queued for later
    assert!(matches!(client.handle(Input::ColumnSelected(2)), Err(SessionError::NotYourTurn)));
    assert_eq!(0, client.grid().piece_count());

    assert_eq!(1, ended_count(&client.handle(Input::Abort).unwrap()));
    assert_eq!(Some(&SessionEnd::Aborted), client.end_reason());

    pump_until(&mut host, |s| s.is_terminated());
    assert!(matches!(host.end_reason(), Some(SessionEnd::ConnectionLost(_))));
}
