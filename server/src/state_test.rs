use tokio::sync::mpsc::{self, UnboundedReceiver};
use wire::{SELF_ID, ServerMessage};

use super::*;

fn drain(rx: &mut UnboundedReceiver<Vec<u8>>) -> Vec<ServerMessage> {
    let mut out = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        out.push(ServerMessage::decode(&frame).expect("frame"));
    }
    out
}

// --- seating ---

#[test]
fn ids_are_assigned_sequentially_from_one() {
    let mut hub = Hub::new();
    let (tx, _rx_a) = mpsc::unbounded_channel();
    assert_eq!(hub.join(tx), 1);
    let (tx, _rx_b) = mpsc::unbounded_channel();
    assert_eq!(hub.join(tx), 2);
    assert_eq!(hub.seats().len(), 2);
}

#[test]
fn the_id_counter_skips_the_reserved_self_id_on_wrap() {
    let mut hub = Hub::new();
    hub.next_id = u16::MAX;
    let (tx, _rx_a) = mpsc::unbounded_channel();
    assert_eq!(hub.join(tx), u16::MAX);
    let (tx, _rx_b) = mpsc::unbounded_channel();
    assert_eq!(hub.join(tx), 1);
}

#[test]
fn a_join_is_announced_to_existing_seats() {
    let mut hub = Hub::new();
    let (tx_a, mut rx_a) = mpsc::unbounded_channel();
    let a = hub.join(tx_a);
    let _ = drain(&mut rx_a);

    let (tx_b, _rx_b) = mpsc::unbounded_channel();
    let b = hub.join(tx_b);

    let seen = drain(&mut rx_a);
    assert_eq!(seen.len(), 1);
    assert!(matches!(seen[0], ServerMessage::SnailJoined { id, .. } if id == b));
    assert_ne!(a, b);
}

#[test]
fn a_newcomer_is_caught_up_on_seats_and_history() {
    let mut hub = Hub::new();
    let (tx_a, _rx_a) = mpsc::unbounded_channel();
    let a = hub.join(tx_a);
    hub.point_placed(a, 10, 20, 30, wire::Color(5), u16::from(b'h'));

    let (tx_b, mut rx_b) = mpsc::unbounded_channel();
    let _b = hub.join(tx_b);

    let seen = drain(&mut rx_b);
    assert_eq!(seen.len(), 3);
    assert!(matches!(seen[0], ServerMessage::SnailJoined { id, .. } if id == a));
    assert!(matches!(seen[1], ServerMessage::SnailJoined { id, .. } if id == SELF_ID));
    assert!(
        matches!(seen[2], ServerMessage::PointPlaced { id, code, .. } if id == a && code == u16::from(b'h'))
    );
}

#[test]
fn the_newcomer_sees_its_own_seat_as_self() {
    let mut hub = Hub::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = hub.join(tx);
    assert_ne!(id, SELF_ID);

    let seen = drain(&mut rx);
    assert_eq!(seen.len(), 1);
    assert!(matches!(seen[0], ServerMessage::SnailJoined { id, .. } if id == SELF_ID));
}

// --- fan-out ---

#[test]
fn points_are_recorded_and_fanned_out_excluding_the_sender() {
    let mut hub = Hub::new();
    let (tx_a, mut rx_a) = mpsc::unbounded_channel();
    let a = hub.join(tx_a);
    let (tx_b, mut rx_b) = mpsc::unbounded_channel();
    let b = hub.join(tx_b);
    let _ = drain(&mut rx_a);
    let _ = drain(&mut rx_b);

    hub.point_placed(a, 1, 2, 3, wire::Color(4), u16::from(b'x'));

    assert_eq!(hub.history().len(), 1);
    assert!(drain(&mut rx_a).is_empty(), "sender must not hear its own point");
    let seen = drain(&mut rx_b);
    assert_eq!(seen.len(), 1);
    assert!(matches!(seen[0], ServerMessage::PointPlaced { id, .. } if id == a));
    assert_ne!(a, b);
}

#[test]
fn moves_update_the_seat_and_fan_out_excluding_the_sender() {
    let mut hub = Hub::new();
    let (tx_a, mut rx_a) = mpsc::unbounded_channel();
    let a = hub.join(tx_a);
    let (tx_b, mut rx_b) = mpsc::unbounded_channel();
    let _b = hub.join(tx_b);
    let _ = drain(&mut rx_a);
    let _ = drain(&mut rx_b);

    hub.snail_moved(a, 111, 222, 45);

    let seat = hub.seats().iter().find(|s| s.id == a).expect("seat");
    assert_eq!((seat.x, seat.y, seat.ang), (111, 222, 45));
    assert!(drain(&mut rx_a).is_empty());
    let seen = drain(&mut rx_b);
    assert!(matches!(seen[0], ServerMessage::SnailMoved { id, x: 111, .. } if id == a));
}

#[test]
fn a_move_for_a_departed_seat_still_fans_out() {
    let mut hub = Hub::new();
    let (tx_a, _rx_a) = mpsc::unbounded_channel();
    let a = hub.join(tx_a);
    let (tx_b, mut rx_b) = mpsc::unbounded_channel();
    let _b = hub.join(tx_b);
    let _ = drain(&mut rx_b);

    hub.leave(a);
    let _ = drain(&mut rx_b);
    hub.snail_moved(a, 1, 2, 3);
    let seen = drain(&mut rx_b);
    assert_eq!(seen.len(), 1);
}

// --- leaving ---

#[test]
fn leaving_drops_the_seat_and_tells_the_room() {
    let mut hub = Hub::new();
    let (tx_a, _rx_a) = mpsc::unbounded_channel();
    let a = hub.join(tx_a);
    let (tx_b, mut rx_b) = mpsc::unbounded_channel();
    let _b = hub.join(tx_b);
    let _ = drain(&mut rx_b);

    hub.leave(a);

    assert_eq!(hub.seats().len(), 1);
    let seen = drain(&mut rx_b);
    assert!(matches!(seen[0], ServerMessage::SnailLeft { id } if id == a));
}

#[test]
fn a_closed_channel_does_not_break_the_fan_out() {
    let mut hub = Hub::new();
    let (tx_a, rx_a) = mpsc::unbounded_channel();
    let a = hub.join(tx_a);
    drop(rx_a);

    let (tx_b, mut rx_b) = mpsc::unbounded_channel();
    let b = hub.join(tx_b);
    let _ = drain(&mut rx_b);

    hub.point_placed(b, 1, 2, 3, wire::Color(0), u16::from(b'y'));
    assert_eq!(hub.history().len(), 1);
    assert_ne!(a, b);
}

// --- spawns ---

#[test]
fn spawn_colors_keep_every_channel_dim() {
    let mut rng = rand::rng();
    for _ in 0..100 {
        let (r, g, b) = spawn_color(&mut rng).channels();
        assert!(r < 0x80 && g < 0x80 && b < 0x80, "got #{r:02x}{g:02x}{b:02x}");
    }
}

#[test]
fn seats_spawn_at_the_origin_with_a_wire_range_heading() {
    let mut hub = Hub::new();
    let (tx, _rx) = mpsc::unbounded_channel();
    hub.join(tx);
    let seat = &hub.seats()[0];
    assert_eq!((seat.x, seat.y), (0, 0));
    assert!(seat.ang < 360);
}
