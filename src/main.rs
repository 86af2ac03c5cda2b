use bevy::input::mouse::MouseButton;
use bevy::prelude::*;
use motion_core::{EngineNotification, MotionEngine, MotionEnginePlugin, MotionType, UpdateMode};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(MotionEnginePlugin::default())
        // Dark background
        .insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.08)))
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                handle_keyboard_commands,
                handle_pointer_drag,
                drain_engine_notifications,
                draw_engine_gizmos,
            ),
        )
        .run();
}

const PLAY_AREA_HALF: f32 = 300.0;

fn setup(mut commands: Commands, mut engine: ResMut<MotionEngine>) {
    commands.spawn(Camera2d);
    engine.set_bounds(Vec2::splat(-PLAY_AREA_HALF), Vec2::splat(PLAY_AREA_HALF));
    info!("R toggles record/playback, Space toggles pause, 1/2/3 select mode");
}

/// Keyboard command surface:
/// R record/playback, Space play/pause, 1/2/3 position/velocity/
/// acceleration mode, A manual/automatic, C clear, W rewind, O origin.
fn handle_keyboard_commands(keys: Res<ButtonInput<KeyCode>>, mut engine: ResMut<MotionEngine>) {
    if keys.just_pressed(KeyCode::KeyR) {
        let recording = engine.is_recording();
        engine.set_recording(!recording);
    }
    if keys.just_pressed(KeyCode::Space) {
        if engine.is_paused() {
            engine.play();
        } else {
            engine.pause();
        }
    }
    if keys.just_pressed(KeyCode::Digit1) {
        engine.set_mode(UpdateMode::Position);
    }
    if keys.just_pressed(KeyCode::Digit2) {
        engine.set_mode(UpdateMode::Velocity);
    }
    if keys.just_pressed(KeyCode::Digit3) {
        engine.set_mode(UpdateMode::Acceleration);
    }
    if keys.just_pressed(KeyCode::KeyA) {
        let next = match engine.motion_type() {
            MotionType::Manual => MotionType::Automatic,
            MotionType::Automatic => MotionType::Manual,
        };
        engine.set_motion_type(next);
    }
    if keys.just_pressed(KeyCode::KeyC) {
        engine.clear();
    }
    if keys.just_pressed(KeyCode::KeyW) {
        engine.rewind();
    }
    if keys.just_pressed(KeyCode::KeyO) {
        engine.return_to_origin();
    }
}

/// Feed pointer drags into the engine as raw sample points.
fn handle_pointer_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut engine: ResMut<MotionEngine>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    if buttons.just_pressed(MouseButton::Left) {
        engine.start_sampling();
    }
    if buttons.just_released(MouseButton::Left) {
        engine.stop_sampling();
    }

    if buttons.pressed(MouseButton::Left) {
        if let Some(cursor) = window.cursor_position() {
            if let Ok(world) = camera.viewport_to_world_2d(camera_transform, cursor) {
                engine.set_sample_point_from_vec(world);
            }
        }
    }
}

/// Drain the engine's notification channel so UI-facing debug logging
/// stays in sync with engine mutations.
fn drain_engine_notifications(
    mut engine: ResMut<MotionEngine>,
    mut receiver: Local<Option<async_channel::Receiver<EngineNotification>>>,
) {
    let receiver = receiver.get_or_insert_with(|| engine.subscribe());
    while let Ok(notification) = receiver.try_recv() {
        match notification {
            EngineNotification::StateChanged(key) => debug!("engine state changed: {:?}", key),
            other => trace!("engine notification: {:?}", other),
        }
    }
}

/// Draw the body, its velocity and acceleration arrows, and the
/// recorded trail.
fn draw_engine_gizmos(mut gizmos: Gizmos, engine: Res<MotionEngine>) {
    let body = engine.body();

    // Recorded trail from the culled history
    let mut previous: Option<Vec2> = None;
    for snapshot in engine.culled_history() {
        if let Some(from) = previous {
            gizmos.line_2d(from, snapshot.position, Color::srgb(0.3, 0.3, 0.5));
        }
        previous = Some(snapshot.position);
    }

    // Body disc, oriented by heading
    gizmos.circle_2d(body.position(), 12.0, Color::srgb(0.9, 0.2, 0.2));
    let nose = body.position() + Vec2::from_angle(body.heading()) * 16.0;
    gizmos.line_2d(body.position(), nose, Color::srgb(0.9, 0.6, 0.2));

    // Velocity (green) and acceleration (magenta) arrows
    gizmos.arrow_2d(
        body.position(),
        body.position() + body.velocity() * 0.25,
        Color::srgb(0.2, 0.9, 0.2),
    );
    gizmos.arrow_2d(
        body.position(),
        body.position() + body.acceleration() * 0.1,
        Color::srgb(0.9, 0.2, 0.9),
    );

    // Play area outline
    gizmos.rect_2d(
        Isometry2d::IDENTITY,
        Vec2::splat(PLAY_AREA_HALF * 2.0),
        Color::srgb(0.2, 0.2, 0.25),
    );
}
