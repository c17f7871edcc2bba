//! Abstraction for handling devices in the leds class
//!
//! # Implementation
//!
//! This is the generic Linux LED class, see the [kernel docs][1].
//!
//! The EV3 brick has two bi-color LEDs, exposed as four devices.
//!
//! [1]: https://www.kernel.org/doc/Documentation/ABI/testing/sysfs-class-led
use std::fmt;

use crate::{
    attribute::{selected, Domain, ModeSet, Value},
    class::Device,
    error::DeviceError,
    registry::{Port, Registry},
    Result,
};

/// An LED trigger, like `none`, `timer` or `heartbeat`.
///
/// Reading `trigger` lists every trigger with the active one in brackets,
/// this is the bracketed one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Trigger(String);

impl Trigger {
    /// Kernel name of the trigger
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Trigger {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for Trigger {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Value for Trigger {
    const DOMAIN: Domain = Domain::Text;

    fn parse(_: &str, raw: &str) -> Result<Self> {
        Ok(Self(selected(raw).unwrap_or_else(|| raw.trim()).to_owned()))
    }

    fn render(&self) -> String {
        self.0.clone()
    }
}

attributes! {
    /// Attributes of the `leds` class.
    pub trait LedAttributes: Device {
        /// Maximum brightness value.
        read max_brightness: i32 = "max_brightness";

        /// Brightness, `0..=max_brightness`.
        read_write brightness, set_brightness: i32 = "brightness";

        /// Active trigger.
        read_write trigger, set_trigger: Trigger = "trigger";

        /// Milliseconds on, while the `timer` trigger is active.
        read_write delay_on, set_delay_on: i32 = "delay_on";

        /// Milliseconds off, while the `timer` trigger is active.
        read_write delay_off, set_delay_off: i32 = "delay_off";

        /// Every available trigger.
        fn triggers(&self) -> Result<ModeSet> {
            self.handle().get("trigger")
        }

        /// Full brightness
        fn on(&self) -> Result<()> {
            self.set_brightness(self.max_brightness()?)
        }

        /// Zero brightness
        fn off(&self) -> Result<()> {
            self.set_brightness(0)
        }

        /// Blink, `on_ms` on then `off_ms` off, using the `timer` trigger.
        ///
        /// # Errors
        ///
        /// - [`DeviceError::InvalidValue`] if a delay doesn't fit the
        ///   attribute, before anything is written
        fn flash(&self, on_ms: u32, off_ms: u32) -> Result<()> {
            let on = delay("delay_on", on_ms)?;
            let off = delay("delay_off", off_ms)?;
            self.set_trigger("timer")?;
            self.set_delay_on(on)?;
            self.set_delay_off(off)
        }
    }
}

fn delay(attribute: &str, ms: u32) -> Result<i32> {
    i32::try_from(ms).map_err(|_| DeviceError::InvalidValue {
        attribute: attribute.to_owned(),
        value: ms.to_string(),
    })
}

device! {
    /// Any LED
    pub struct Led {
        class: "leds",
        pattern: "*",
        drivers: [],
        attributes: [LedAttributes],
    }
}

impl Led {
    /// Left red LED on the EV3 brick
    pub const RED_LEFT: &'static str = "ev3:red:left";

    /// Right red LED on the EV3 brick
    pub const RED_RIGHT: &'static str = "ev3:red:right";

    /// Left green LED on the EV3 brick
    pub const GREEN_LEFT: &'static str = "ev3:green:left";

    /// Right green LED on the EV3 brick
    pub const GREEN_RIGHT: &'static str = "ev3:green:right";

    const RED: &'static [&'static str] = &[Self::RED_LEFT, Self::RED_RIGHT];

    const GREEN: &'static [&'static str] = &[Self::GREEN_LEFT, Self::GREEN_RIGHT];

    /// Claim each LED in `names` from `registry` in turn, apply `f`, and
    /// release it again.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::DeviceNotFound`] if an LED is missing or claimed
    ///   elsewhere. LEDs before it have already been changed.
    fn each(registry: &Registry, names: &[&str], f: fn(&Led) -> Result<()>) -> Result<()> {
        for name in names {
            f(&Led::new(registry, Port::name(*name))?)?;
        }
        Ok(())
    }

    /// Both red brick LEDs on
    pub fn red_on(registry: &Registry) -> Result<()> {
        Self::each(registry, Self::RED, |led| led.on())
    }

    pub fn red_off(registry: &Registry) -> Result<()> {
        Self::each(registry, Self::RED, |led| led.off())
    }

    /// Both green brick LEDs on
    pub fn green_on(registry: &Registry) -> Result<()> {
        Self::each(registry, Self::GREEN, |led| led.on())
    }

    pub fn green_off(registry: &Registry) -> Result<()> {
        Self::each(registry, Self::GREEN, |led| led.off())
    }

    /// Every brick LED on. Red and green together show amber.
    pub fn all_on(registry: &Registry) -> Result<()> {
        Self::red_on(registry)?;
        Self::green_on(registry)
    }

    /// Every brick LED off
    pub fn all_off(registry: &Registry) -> Result<()> {
        Self::red_off(registry)?;
        Self::green_off(registry)
    }
}
