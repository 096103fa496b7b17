#![allow(clippy::float_cmp)]

use std::f64::consts::PI;

use wire::{Color, SELF_ID};

use super::*;

const RED: Color = Color(0xf800);

fn seeded_world() -> World {
    let mut world = World::new();
    world.add_player(SELF_ID, 100.0, 200.0, 0.5, RED);
    world.add_player(7, 300.0, 400.0, -0.5, Color(0x07e0));
    world
}

// --- players ---

#[test]
fn add_player_marks_the_reserved_id_local() {
    let world = seeded_world();
    let local = world.local().expect("local player");
    assert_eq!(local.id, SELF_ID);
    assert_eq!(local.x, 100.0);
}

#[test]
fn add_player_overwrites_an_existing_id() {
    let mut world = seeded_world();
    world.add_player(7, 1.0, 2.0, 0.0, RED);
    assert_eq!(world.players().len(), 2);
    let p = world.players().iter().find(|p| p.id == 7).expect("player 7");
    assert_eq!((p.x, p.y), (1.0, 2.0));
}

#[test]
fn add_player_normalizes_coordinates_and_heading() {
    let mut world = World::new();
    world.add_player(3, -1.0, 70_000.0, 4.0, RED);
    let p = world.players()[0];
    assert_eq!(p.x, 65535.0);
    assert!((p.y - 4464.0).abs() < 1e-9);
    assert!((p.ang - (4.0 - 2.0 * PI)).abs() < 1e-9);
}

#[test]
fn move_player_updates_pose() {
    let mut world = seeded_world();
    world.move_player(7, 500.0, 600.0, 1.0);
    let p = world.players().iter().find(|p| p.id == 7).expect("player 7");
    assert_eq!((p.x, p.y, p.ang), (500.0, 600.0, 1.0));
}

#[test]
fn move_player_ignores_unknown_ids() {
    let mut world = seeded_world();
    let before: Vec<_> = world.players().to_vec();
    world.move_player(99, 1.0, 2.0, 3.0);
    assert_eq!(world.players(), before.as_slice());
}

#[test]
fn remove_player_drops_the_snail() {
    let mut world = seeded_world();
    world.remove_player(7);
    assert_eq!(world.players().len(), 1);
    assert!(world.local().is_some());
}

#[test]
fn remove_player_ignores_unknown_ids() {
    let mut world = seeded_world();
    world.remove_player(99);
    assert_eq!(world.players().len(), 2);
}

#[test]
fn local_is_none_until_the_join_arrives() {
    let mut world = World::new();
    world.add_player(5, 0.0, 0.0, 0.0, RED);
    assert!(world.local().is_none());
}

// --- glyphs ---

#[test]
fn glyphs_keep_placement_order() {
    let mut world = World::new();
    for (i, ch) in ['s', 'n', 'a', 'i', 'l'].into_iter().enumerate() {
        world.add_glyph(ch, i as f64, 0.0, 0.0, RED);
    }
    let chs: Vec<char> = world.glyphs().iter().map(|g| g.ch).collect();
    assert_eq!(chs, vec!['s', 'n', 'a', 'i', 'l']);
}

#[test]
fn glyphs_are_snapshots_of_the_placement_pose() {
    let mut world = seeded_world();
    world.add_glyph('x', 100.0, 200.0, 0.5, RED);
    world.move_player(SELF_ID, 999.0, 999.0, 1.0);
    let g = world.glyphs()[0];
    assert_eq!((g.x, g.y, g.ang), (100.0, 200.0, 0.5));
}

// --- dirty flag ---

#[test]
fn a_new_world_owes_its_first_draw() {
    let mut world = World::new();
    assert!(world.take_dirty());
    assert!(!world.take_dirty());
}

#[test]
fn mutations_set_the_dirty_flag() {
    let mut world = seeded_world();
    assert!(world.take_dirty());

    world.move_player(7, 1.0, 1.0, 0.0);
    assert!(world.take_dirty());

    world.add_glyph('a', 0.0, 0.0, 0.0, RED);
    assert!(world.take_dirty());

    world.remove_player(7);
    assert!(world.take_dirty());
    assert!(!world.is_dirty());
}

#[test]
fn unknown_id_mutations_leave_the_flag_clean() {
    let mut world = seeded_world();
    let _ = world.take_dirty();
    world.move_player(99, 1.0, 1.0, 0.0);
    world.remove_player(99);
    assert!(!world.is_dirty());
}
