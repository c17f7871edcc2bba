//! Typed bindings to the ev3dev device classes
//!
//! # Implementation details
//!
//! ev3dev exposes every motor, sensor, LED and port of a LEGO MINDSTORMS EV3
//! as a directory of attribute files under `/sys/class`, so this library
//! requires it to exist.
//!
//! Nothing is cached. Every getter reads the attribute file and every setter
//! writes it, so values are always what the driver currently reports.
//!
//! Devices are claimed through a [`registry::Registry`], so two objects never
//! drive the same hardware. The claim is given up when the object is dropped.
//!
//! # Examples
//!
//! ```rust,no_run
//! use ev3dev_sysfs::prelude::*;
//!
//! # fn main() -> ev3dev_sysfs::Result<()> {
//! let registry = Registry::new();
//! let motor = LargeMotor::new(&registry, Port::connected(OUTPUT_A))?;
//! let touch = TouchSensor::new(&registry, Port::Auto)?;
//!
//! motor.set_speed_sp(500)?;
//! motor.run_forever()?;
//! while touch.value(0)? == 0 {}
//! motor.stop()?;
//! # Ok(())
//! # }
//! ```
#![doc(html_root_url = "https://docs.rs/ev3dev-sysfs/0.1.0")]

#[macro_use]
pub mod attribute;

pub mod class;
pub mod error;
pub mod registry;
mod util;

#[cfg(test)]
mod testing;

/// Result type, defaulting to [`error::DeviceError`]
pub type Result<T, E = error::DeviceError> = std::result::Result<T, E>;

/// Device types, their attribute traits, and the [`Registry`][registry::Registry]
pub mod prelude {
    pub use crate::{
        class::{
            led::{Led, LedAttributes},
            motor::{
                DcMotor,
                DcMotorAttributes,
                LargeMotor,
                MediumMotor,
                ServoMotor,
                ServoMotorAttributes,
                TachoMotor,
                TachoMotorAttributes,
            },
            port::{LegoPort, LegoPortAttributes},
            power_supply::{PowerSupply, PowerSupplyAttributes},
            remote::{Buttons, RemoteControl},
            sensor::{
                ColorSensor,
                GyroSensor,
                I2cSensor,
                I2cSensorAttributes,
                InfraredSensor,
                LightSensor,
                Sensor,
                SensorAttributes,
                SoundSensor,
                TouchSensor,
                UltrasonicSensor,
            },
            Device,
        },
        registry::{
            Port,
            Registry,
            INPUT_1,
            INPUT_2,
            INPUT_3,
            INPUT_4,
            OUTPUT_A,
            OUTPUT_B,
            OUTPUT_C,
            OUTPUT_D,
        },
    };
}
