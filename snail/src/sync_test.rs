#![allow(clippy::float_cmp)]

use wire::{CodecError, Color, SELF_ID, ServerMessage};

use super::*;

const TEAL: Color = Color(0x07ff);

fn apply_msg(world: &mut World, motion: &mut Motion, msg: &ServerMessage) {
    apply(world, motion, &msg.encode()).expect("apply");
}

// --- inbound application ---

#[test]
fn join_adds_the_player() {
    let mut world = World::new();
    let mut motion = Motion::seeded(1);
    apply_msg(
        &mut world,
        &mut motion,
        &ServerMessage::SnailJoined { id: 4, x: 10, y: 20, ang: 90, color: TEAL },
    );
    let p = world.players()[0];
    assert_eq!(p.id, 4);
    assert_eq!((p.x, p.y), (10.0, 20.0));
    assert!((p.ang - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
}

#[test]
fn a_self_join_seeds_the_steering_target() {
    let mut world = World::new();
    let mut motion = Motion::seeded(1);
    apply_msg(
        &mut world,
        &mut motion,
        &ServerMessage::SnailJoined { id: SELF_ID, x: 0, y: 0, ang: 45, color: TEAL },
    );
    assert!(world.local().is_some());
    assert!((motion.heading_target() - 45.0_f64.to_radians()).abs() < 1e-9);
}

#[test]
fn a_remote_join_leaves_the_steering_target_alone() {
    let mut world = World::new();
    let mut motion = Motion::seeded(1);
    apply_msg(
        &mut world,
        &mut motion,
        &ServerMessage::SnailJoined { id: 9, x: 0, y: 0, ang: 45, color: TEAL },
    );
    assert_eq!(motion.heading_target(), 0.0);
}

#[test]
fn moved_updates_the_matching_player() {
    let mut world = World::new();
    let mut motion = Motion::seeded(1);
    apply_msg(
        &mut world,
        &mut motion,
        &ServerMessage::SnailJoined { id: 4, x: 0, y: 0, ang: 0, color: TEAL },
    );
    apply_msg(
        &mut world,
        &mut motion,
        &ServerMessage::SnailMoved { id: 4, x: 1000, y: 2000, ang: 180 },
    );
    let p = world.players()[0];
    assert_eq!((p.x, p.y), (1000.0, 2000.0));
}

#[test]
fn moved_for_an_unknown_id_is_tolerated() {
    let mut world = World::new();
    let mut motion = Motion::seeded(1);
    apply_msg(&mut world, &mut motion, &ServerMessage::SnailMoved { id: 42, x: 1, y: 2, ang: 3 });
    assert!(world.players().is_empty());
}

#[test]
fn point_appends_a_glyph() {
    let mut world = World::new();
    let mut motion = Motion::seeded(1);
    apply_msg(
        &mut world,
        &mut motion,
        &ServerMessage::PointPlaced {
            id: 4,
            x: 5,
            y: 6,
            ang: 0,
            color: TEAL,
            code: u16::from(b'q'),
        },
    );
    let g = world.glyphs()[0];
    assert_eq!(g.ch, 'q');
    assert_eq!((g.x, g.y), (5.0, 6.0));
    assert_eq!(g.color, TEAL);
}

#[test]
fn a_lone_surrogate_code_renders_as_the_replacement_character() {
    let mut world = World::new();
    let mut motion = Motion::seeded(1);
    apply_msg(
        &mut world,
        &mut motion,
        &ServerMessage::PointPlaced { id: 4, x: 0, y: 0, ang: 0, color: TEAL, code: 0xd800 },
    );
    assert_eq!(world.glyphs()[0].ch, char::REPLACEMENT_CHARACTER);
}

#[test]
fn left_removes_the_player() {
    let mut world = World::new();
    let mut motion = Motion::seeded(1);
    apply_msg(
        &mut world,
        &mut motion,
        &ServerMessage::SnailJoined { id: 4, x: 0, y: 0, ang: 0, color: TEAL },
    );
    apply_msg(&mut world, &mut motion, &ServerMessage::SnailLeft { id: 4 });
    assert!(world.players().is_empty());
}

#[test]
fn an_unknown_tag_fails_without_touching_the_world() {
    let mut world = World::new();
    let mut motion = Motion::seeded(1);
    let err = apply(&mut world, &mut motion, &[77, 0, 0]).expect_err("unknown tag");
    assert!(matches!(err, CodecError::UnknownTag(77)));
    assert!(world.players().is_empty());
    assert!(world.glyphs().is_empty());
}

// --- outbound encoding ---

#[test]
fn frame_sender_encodes_moves_for_the_wire() {
    let mut frames = Vec::new();
    {
        let mut sender = FrameSender::new(|f| frames.push(f));
        sender.snail_moved(Pose::new(1000.4, 2000.9, std::f64::consts::FRAC_PI_2));
    }
    assert_eq!(frames.len(), 1);
    let decoded = wire::ClientMessage::decode(&frames[0]).expect("decode");
    assert_eq!(decoded, wire::ClientMessage::SnailMoved { x: 1000, y: 2000, ang: 90 });
}

#[test]
fn frame_sender_encodes_points_with_the_char_code() {
    let mut frames = Vec::new();
    {
        let mut sender = FrameSender::new(|f| frames.push(f));
        sender.point_placed('s', Pose::new(3.0, 4.0, 0.0), TEAL);
    }
    let decoded = wire::ClientMessage::decode(&frames[0]).expect("decode");
    assert_eq!(
        decoded,
        wire::ClientMessage::PointPlaced { x: 3, y: 4, ang: 0, color: TEAL, code: u16::from(b's') }
    );
}

#[test]
fn frame_sender_wraps_out_of_range_coordinates() {
    let mut frames = Vec::new();
    {
        let mut sender = FrameSender::new(|f| frames.push(f));
        sender.snail_moved(Pose::new(-10.0, 65536.0 + 5.0, 0.0));
    }
    let decoded = wire::ClientMessage::decode(&frames[0]).expect("decode");
    assert_eq!(decoded, wire::ClientMessage::SnailMoved { x: 65526, y: 5, ang: 0 });
}
