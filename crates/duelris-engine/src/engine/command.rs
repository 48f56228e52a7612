/// A discrete input accepted by [`GameEngine::apply`](super::GameEngine::apply).
///
/// Human key bindings and the AI controller both produce these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Command {
    #[display("left")]
    MoveLeft,
    #[display("right")]
    MoveRight,
    #[display("down")]
    MoveDown,
    #[display("rotate")]
    Rotate,
    #[display("hard-drop")]
    HardDrop,
}
