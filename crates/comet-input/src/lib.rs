//! Declarative input conditions over per-frame device snapshots: keyboard,
//! mouse, gamepad, touch, and voice checks with debounce, hold, cooldown, and
//! at-most-once-per-frame consumption semantics.

pub mod adapters;
pub mod backend;
pub mod boolean;
pub mod composite;
pub mod condition;
pub mod error;
pub mod gamepad;
pub mod keyboard;
pub mod logic;
pub mod manager;
pub mod mouse;
pub mod poll;
pub mod settings;
pub mod state;
pub mod touch;
pub mod value;
pub mod voice;

pub use adapters::{
    ButtonPhase, GestureSource, KeySource, LockSource, MouseButtonSource, MouseMotionSource,
    PadButtonSource, PadMotionSource, PhraseSource,
};
pub use backend::PlatformPoller;
pub use boolean::{BooleanCondition, BooleanSource};
pub use composite::{AllCondition, AnyCondition};
pub use condition::{
    ConditionPhase, ConditionSettings, EventHooks, FireDetails, FireEvent, InputCondition, Source,
};
pub use error::InputError;
pub use gamepad::{
    GamepadButton, GamepadSensor, GamepadSnapshot, GamepadTracker, InputMode, SensorValueMode,
};
pub use keyboard::{KeyboardSnapshot, KeyboardTracker, LockKey};
pub use logic::{LogicCondition, MouseSensorSource, PadStickSource, PadTriggerSource, SensorSource};
pub use manager::InputManager;
pub use mouse::{MouseButton, MouseSensor, MouseSnapshot, MouseTracker};
pub use poll::{InputPoller, ManualPoller};
pub use settings::InputSettings;
pub use state::InputState;
pub use touch::{Gesture, GestureKind, TouchTracker};
pub use value::{Comparison, Rect, Value, ValueKind, ValueLogic};
pub use voice::VoiceTracker;
