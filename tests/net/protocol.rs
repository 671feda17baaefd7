use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};

use connect_four::error::{MoveError, ProtocolViolation};
use connect_four::net::session::MAX_LINE_LEN;
use connect_four::net::{NetworkSession, SessionEnd};

use crate::net::{ended_count, pump_until};

/// A client session joined to a bare listener that sends `first_line`.
fn client_receiving(first_line: &str) -> (NetworkSession, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let client = NetworkSession::join(listener.local_addr().unwrap(), 6, "bob").unwrap();

    let (mut peer, _) = listener.accept().unwrap();
    peer.write_all(first_line.as_bytes()).unwrap();
    (client, peer)
}

/// A host session joined by a bare socket, with the dimension line already consumed.
fn host_with_raw_client(size: usize) -> (NetworkSession, TcpStream, BufReader<TcpStream>) {
    let mut host = NetworkSession::host("127.0.0.1:0", size, "alice").unwrap();
    let peer = TcpStream::connect(host.local_addr()).unwrap();
    let mut reader = BufReader::new(peer.try_clone().unwrap());

    let mut line = String::new();
    reader.read_line(&mut line).unwrap();
    assert_eq!(format!("{}\n", size), line);

    pump_until(&mut host, |s| s.is_connected());
    (host, peer, reader)
}

fn read_line(reader: &mut BufReader<TcpStream>) -> String {
    let mut line = String::new();
    reader.read_line(&mut line).unwrap();
    line
}

fn assert_violation(session: &mut NetworkSession, expected: ProtocolViolation) {
    let events = pump_until(session, |s| s.is_terminated());
    assert_eq!(Some(&SessionEnd::ProtocolViolation(expected)), session.end_reason());
    assert_eq!(1, ended_count(&events));
}

#[test]
fn dimension_out_of_range() {
    let (mut client, _peer) = client_receiving("42\n");
    assert_violation(&mut client, ProtocolViolation::InvalidDimension(42));
}

#[test]
fn dimension_garbage() {
    let (mut client, _peer) = client_receiving("hello\n");
    assert_violation(&mut client, ProtocolViolation::Malformed("hello".to_string()));
}

#[test]
fn dimension_missing() {
    let (mut client, _peer) = client_receiving("GAME OVER: eve Win\n");
    assert_violation(
        &mut client,
        ProtocolViolation::MissingDimension("GAME OVER: eve Win".to_string()),
    );
}

#[test]
fn handshake_accepts_windows_newlines() {
    let (mut client, _peer) = client_receiving("5\r\n");
    pump_until(&mut client, |s| s.is_connected());
    assert_eq!(5, client.grid().columns());
}

#[test]
fn host_wire_format() {
    let (mut host, _peer, mut reader) = host_with_raw_client(7);

    host.select_column(3).unwrap();
    assert_eq!("3\n", read_line(&mut reader));
}

#[test]
fn winner_sends_game_over() {
    let (mut host, mut peer, mut reader) = host_with_raw_client(4);

    for column in 0..3 {
        host.select_column(column).unwrap();
        assert_eq!(format!("{}\n", column), read_line(&mut reader));
        peer.write_all(format!("{}\n", column).as_bytes()).unwrap();
        pump_until(&mut host, |s| s.is_local_turn());
    }
    host.select_column(3).unwrap();

    assert_eq!("3\n", read_line(&mut reader));
    assert_eq!("GAME OVER: alice Win\n", read_line(&mut reader));
    assert_eq!(Some(&SessionEnd::Won), host.end_reason());
}

#[test]
fn move_out_of_turn() {
    let (mut host, mut peer, _reader) = host_with_raw_client(7);

    peer.write_all(b"3\n").unwrap();
    assert_violation(&mut host, ProtocolViolation::OutOfTurn(3));
    assert_eq!(0, host.grid().piece_count());
}

#[test]
fn move_garbage() {
    let (mut host, mut peer, mut reader) = host_with_raw_client(7);
    host.select_column(0).unwrap();
    read_line(&mut reader);

    peer.write_all(b"left\n").unwrap();
    assert_violation(&mut host, ProtocolViolation::Malformed("left".to_string()));
}

#[test]
fn move_outside_grid() {
    let (mut host, mut peer, mut reader) = host_with_raw_client(7);
    host.select_column(0).unwrap();
    read_line(&mut reader);

    peer.write_all(b"9\n").unwrap();
    assert_violation(
        &mut host,
        ProtocolViolation::IllegalMove(MoveError::InvalidColumn(9)),
    );
    assert_eq!(1, host.grid().piece_count());
}

#[test]
fn opponent_game_over_is_trusted() {
    let (mut host, mut peer, mut reader) = host_with_raw_client(7);
    host.select_column(0).unwrap();
    read_line(&mut reader);

    peer.write_all(b"GAME OVER: mallory Win\n").unwrap();
    pump_until(&mut host, |s| s.is_terminated());
    assert_eq!(Some(&SessionEnd::Lost("mallory Win".to_string())), host.end_reason());
}

#[test]
fn line_without_end() {
    let (mut host, mut peer, mut reader) = host_with_raw_client(7);
    host.select_column(0).unwrap();
    read_line(&mut reader);

    let flood = vec![b'1'; 4 * MAX_LINE_LEN as usize];
    peer.write_all(&flood).unwrap();
    assert_violation(
        &mut host,
        ProtocolViolation::Malformed(format!("line longer than {} bytes", MAX_LINE_LEN)),
    );
    assert_eq!(1, host.grid().piece_count());
}
