//! The EV3 infrared remote control
//!
//! # Implementation
//!
//! The remote is read through an [`InfraredSensor`] in `IR-REMOTE` mode.
//! `value<N>` holds a button code for channel `N + 1`, the channel switch on
//! the remote. Codes are listed in the [infrared sensor docs][1].
//!
//! [1]: https://docs.ev3dev.org/projects/lego-linux-drivers/en/ev3dev-jessie/sensor_data.html#lego-ev3-ir-mode2-value0
use bitflags::bitflags;

use crate::{
    attribute::parse_error,
    class::sensor::{InfraredMode, InfraredSensor, SensorAttributes},
    error::DeviceError,
    Result,
};

bitflags! {
    /// Buttons held on the remote
    pub struct Buttons: u8 {
        const RED_UP = 1 << 0;
        const RED_DOWN = 1 << 1;
        const BLUE_UP = 1 << 2;
        const BLUE_DOWN = 1 << 3;

        /// Beacon mode is on
        const BEACON = 1 << 4;
    }
}

impl Buttons {
    /// Decode an `IR-REMOTE` button code.
    ///
    /// Returns [`None`] for codes outside `0..=11`.
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::empty(),
            1 => Self::RED_UP,
            2 => Self::RED_DOWN,
            3 => Self::BLUE_UP,
            4 => Self::BLUE_DOWN,
            5 => Self::RED_UP | Self::BLUE_UP,
            6 => Self::RED_UP | Self::BLUE_DOWN,
            7 => Self::RED_DOWN | Self::BLUE_UP,
            8 => Self::RED_DOWN | Self::BLUE_DOWN,
            9 => Self::BEACON,
            10 => Self::RED_UP | Self::RED_DOWN,
            11 => Self::BLUE_UP | Self::BLUE_DOWN,
            _ => return None,
        })
    }
}

/// An infrared remote on one channel
#[derive(Debug)]
pub struct RemoteControl {
    sensor: InfraredSensor,

    /// `1..=4`
    channel: u32,

    /// Buttons seen by the last [`RemoteControl::process`]
    state: Buttons,
}

impl RemoteControl {
    /// Listen for the remote on `channel` through `sensor`.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::InvalidValue`] if `channel` isn't `1..=4`
    pub fn new(sensor: InfraredSensor, channel: u32) -> Result<Self> {
        if !(1..=4).contains(&channel) {
            return Err(DeviceError::InvalidValue {
                attribute: "channel".to_owned(),
                value: channel.to_string(),
            });
        }
        Ok(Self {
            sensor,
            channel,
            state: Buttons::empty(),
        })
    }

    pub fn channel(&self) -> u32 {
        self.channel
    }

    pub fn sensor(&self) -> &InfraredSensor {
        &self.sensor
    }

    /// Give back the sensor
    pub fn into_sensor(self) -> InfraredSensor {
        self.sensor
    }

    /// Buttons currently held.
    ///
    /// Switches the sensor to `IR-REMOTE` mode first if needed.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::Parse`] if the sensor reports an unknown code
    pub fn buttons(&self) -> Result<Buttons> {
        if SensorAttributes::mode(&self.sensor)? != InfraredMode::Remote.as_str() {
            self.sensor.set_mode(InfraredMode::Remote)?;
        }
        let index = self.channel - 1;
        let code = self.sensor.value(index)?;
        Buttons::from_code(code)
            .ok_or_else(|| parse_error(&format!("value{index}"), &code.to_string()))
    }

    /// Poll the remote.
    ///
    /// Returns the new buttons if they changed since the last call.
    pub fn process(&mut self) -> Result<Option<Buttons>> {
        let buttons = self.buttons()?;
        if buttons == self.state {
            return Ok(None);
        }
        tracing::debug!(channel = self.channel, ?buttons, "remote buttons changed");
        self.state = buttons;
        Ok(Some(buttons))
    }
}
