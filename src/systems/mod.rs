mod bookkeeping;
mod flocking;
mod movement;
mod player;

pub use bookkeeping::BookkeepingSystem;
pub use flocking::FlockingSystem;
pub use movement::MovementSystem;
pub use player::PlayerSystem;
