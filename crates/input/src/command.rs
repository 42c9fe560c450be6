use cubeview_camera::StepDirection;

/// A discrete state mutation produced by one key press.
///
/// The event loop consumes commands, never raw key codes, so the binding
/// table lives in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Step the camera along one fixed world axis.
    Step(StepDirection),
    /// Flip between solid and wireframe presentation.
    ToggleWireframe,
    /// Terminate the application.
    Quit,
    /// Unbound key; nothing happens.
    Noop,
}

/// The demo's keyboard table.
///
/// `q` always quits. `e` steps down; no key is bound to move-up.
pub fn map_key(key: char) -> Command {
    match key {
        'q' => Command::Quit,
        't' => Command::ToggleWireframe,
        'w' => Command::Step(StepDirection::Forward),
        's' => Command::Step(StepDirection::Back),
        'a' => Command::Step(StepDirection::Left),
        'd' => Command::Step(StepDirection::Right),
        'e' => Command::Step(StepDirection::Down),
        _ => Command::Noop,
    }
}
