//! Capability traits the arbitration loop is written against
//!
//! The loop never touches hardware directly; it is generic over these
//! traits. The firmware injects real drivers, the tests inject mocks.

pub mod actuator;
pub mod clock;
pub mod display;
pub mod input;
pub mod sampler;
pub mod transport;

pub use actuator::{LidActuator, LidPosition};
pub use clock::Clock;
pub use display::{Panel, PanelError, PanelExt, PANEL_COLS, PANEL_ROWS};
pub use input::ResetInput;
pub use sampler::DistanceSampler;
pub use transport::{AlertTransport, TransportError};
