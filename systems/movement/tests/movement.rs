use std::time::Duration;

use wishwalk_core::{
    ActorColor, Button, Command, Direction, Event, InputState, Mode, NpcId, TilePosition,
};
use wishwalk_system_movement::Movement;
use wishwalk_world::{self as world, query, MapSource, NpcDefinition, World, WorldSetup};

const STEP: Duration = Duration::from_millis(110);

#[test]
fn held_down_walks_three_tiles_on_reference_map() {
    let mut world = World::reference().expect("reference world");
    let mut movement = Movement::default();
    let mut pending = Vec::new();
    let down = InputState::new().with(Button::Down);

    assert_eq!(query::player(&world).position, TilePosition::new(3, 3));
    for _ in 0..3 {
        let _ = run_frame(&mut world, &mut movement, &mut pending, STEP, down);
    }

    let player = query::player(&world);
    assert_eq!(player.position, TilePosition::new(3, 6));
    assert_eq!(player.facing, Direction::South);
}

#[test]
fn up_and_right_resolves_to_up() {
    let mut world = World::reference().expect("reference world");
    let mut movement = Movement::default();
    let mut pending = Vec::new();
    let input = InputState::new().with(Button::Up).with(Button::Right);

    let events = run_frame(&mut world, &mut movement, &mut pending, STEP, input);

    assert!(events.contains(&Event::PlayerMoved {
        from: TilePosition::new(3, 3),
        to: TilePosition::new(3, 2),
    }));
    assert_eq!(query::player(&world).facing, Direction::North);
}

#[test]
fn attempts_within_one_step_duration_move_once() {
    let mut world = World::reference().expect("reference world");
    let mut movement = Movement::default();
    let mut pending = Vec::new();
    let down = InputState::new().with(Button::Down);
    let half = Duration::from_millis(50);

    let _ = run_frame(&mut world, &mut movement, &mut pending, half, down);
    let events = run_frame(&mut world, &mut movement, &mut pending, half, down);

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::PlayerMoved { .. })));
    assert_eq!(query::player(&world).position, TilePosition::new(3, 4));

    let _ = run_frame(
        &mut world,
        &mut movement,
        &mut pending,
        Duration::from_millis(60),
        down,
    );
    assert_eq!(query::player(&world).position, TilePosition::new(3, 5));
}

#[test]
fn blocked_step_turns_without_moving() {
    let mut world = World::reference().expect("reference world");
    let mut movement = Movement::default();
    let mut pending = Vec::new();
    let left = InputState::new().with(Button::Left);
    let up = InputState::new().with(Button::Up);

    let _ = run_frame(&mut world, &mut movement, &mut pending, STEP, left);
    let _ = run_frame(&mut world, &mut movement, &mut pending, STEP, left);
    let _ = run_frame(&mut world, &mut movement, &mut pending, STEP, up);
    assert_eq!(query::player(&world).position, TilePosition::new(1, 2));
    assert_eq!(query::player(&world).facing, Direction::North);

    let events = run_frame(&mut world, &mut movement, &mut pending, STEP, left);

    let player = query::player(&world);
    assert_eq!(player.position, TilePosition::new(1, 2));
    assert_eq!(player.facing, Direction::West);
    assert!(player.cooldown.is_zero());
    assert!(events.contains(&Event::PlayerTurned {
        facing: Direction::West
    }));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::PlayerStepBlocked { .. })));
}

#[test]
fn no_steps_are_proposed_without_elapsed_time() {
    let world = World::reference().expect("reference world");
    let mut movement = Movement::default();
    let mut commands = Vec::new();

    movement.handle(
        &[],
        &query::player(&world),
        &InputState::new().with(Button::Down),
        &mut commands,
    );

    assert!(commands.is_empty());
}

#[test]
fn held_keys_never_move_player_while_talking() {
    let mut world = talking_room();
    let mut movement = Movement::default();
    let mut pending = Vec::new();
    let down = InputState::new().with(Button::Down);

    world::apply(
        &mut world,
        Command::OpenDialogue { npc: NpcId::new(0) },
        &mut pending,
    );
    assert_eq!(query::mode(&world), Mode::Talking);

    for _ in 0..5 {
        let _ = run_frame(&mut world, &mut movement, &mut pending, STEP, down);
    }
    assert_eq!(movement.mode(), Mode::Talking);
    assert_eq!(query::player(&world).position, TilePosition::new(1, 1));
    assert_eq!(query::player(&world).facing, Direction::East);

    world::apply(&mut world, Command::AdvanceDialogue, &mut pending);
    assert_eq!(query::mode(&world), Mode::Exploring);

    let _ = run_frame(&mut world, &mut movement, &mut pending, STEP, down);
    assert_eq!(movement.mode(), Mode::Exploring);
    assert_eq!(query::player(&world).position, TilePosition::new(1, 2));
}

fn talking_room() -> World {
    let rows = ["#####", "#...#", "#...#", "#####"]
        .iter()
        .map(|row| (*row).to_owned())
        .collect();
    let mut world = World::from_setup(WorldSetup {
        columns: 0,
        rows: 0,
        map: MapSource::Rows(rows),
        spawn: TilePosition::new(1, 1),
        step_duration: STEP,
        npcs: vec![NpcDefinition::new(
            "Mira",
            TilePosition::new(2, 1),
            ActorColor::from_rgb(200, 40, 40),
            ["Hello."],
        )],
    })
    .expect("valid room");

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::StepPlayer {
            direction: Direction::East,
        },
        &mut events,
    );
    world
}

/// Runs one frame: time advances, then the movement system reacts.
///
/// Events produced outside the frame are taken from `pending` so the system
/// observes mode changes the same way it would in the live loop.
fn run_frame(
    world: &mut World,
    movement: &mut Movement,
    pending: &mut Vec<Event>,
    dt: Duration,
    input: InputState,
) -> Vec<Event> {
    let mut events = std::mem::take(pending);
    world::apply(world, Command::Tick { dt }, &mut events);

    let mut commands = Vec::new();
    movement.handle(&events, &query::player(world), &input, &mut commands);

    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}
