//! Abstraction for handling devices in the lego-sensor class
//!
//! # Implementation
//!
//! Sensors are controlled by setting the `mode` and monitored by reading the
//! `value<N>` attributes. Values are fixed point, divide by
//! 10<sup>`decimals`</sup> to get the real value.
//!
//! Sensors are named `sensor<N>`, which has nothing to do with the port they
//! are plugged into. Use [`Port::Connected`][crate::registry::Port] or
//! `port_name` for that. If there is only one sensor of a kind, the
//! specialized types below find it by `driver_name` wherever it is plugged
//! in.
//!
//! See the [lego-sensor class][1] docs.
//!
//! [1]: https://docs.ev3dev.org/projects/lego-linux-drivers/en/ev3dev-jessie/sensors.html
use crate::{
    attribute::ModeSet,
    class::Device,
    registry::{Port, Registry},
    Result,
};

/// EV3 touch sensor driver
pub const EV3_TOUCH: &str = "lego-ev3-touch";

/// EV3 color sensor driver
pub const EV3_COLOR: &str = "lego-ev3-color";

/// EV3 ultrasonic sensor driver
pub const EV3_ULTRASONIC: &str = "lego-ev3-us";

/// EV3 gyro sensor driver
pub const EV3_GYRO: &str = "lego-ev3-gyro";

/// EV3 infrared sensor driver
pub const EV3_INFRARED: &str = "lego-ev3-ir";

/// NXT touch sensor driver
pub const NXT_TOUCH: &str = "lego-nxt-touch";

/// NXT light sensor driver
pub const NXT_LIGHT: &str = "lego-nxt-light";

/// NXT sound sensor driver
pub const NXT_SOUND: &str = "lego-nxt-sound";

/// NXT ultrasonic sensor driver
pub const NXT_ULTRASONIC: &str = "lego-nxt-us";

/// Generic NXT I2C sensor driver
pub const NXT_I2C_SENSOR: &str = "nxt-i2c-sensor";

/// Generic NXT analog sensor driver
pub const NXT_ANALOG: &str = "nxt-analog";

/// Human readable name for a sensor driver, if it is a known one.
pub fn driver_type_name(driver: &str) -> Option<&'static str> {
    Some(match driver {
        EV3_TOUCH => "EV3 touch",
        EV3_COLOR => "EV3 color",
        EV3_ULTRASONIC => "EV3 ultrasonic",
        EV3_GYRO => "EV3 gyro",
        EV3_INFRARED => "EV3 infrared",
        NXT_TOUCH => "NXT touch",
        NXT_LIGHT => "NXT light",
        NXT_SOUND => "NXT sound",
        NXT_ULTRASONIC => "NXT ultrasonic",
        NXT_I2C_SENSOR => "I2C sensor",
        NXT_ANALOG => "Unknown/generic analog sensor",
        _ => return None,
    })
}

attributes! {
    /// Attributes of the `lego-sensor` class.
    pub trait SensorAttributes: Device {
        /// Sends a command to the sensor.
        write set_command: String = "command";

        /// Valid commands for the sensor.
        ///
        /// Unavailable if the sensor has no commands.
        read commands: ModeSet = "commands";

        /// Decimal places of the `value<N>` attributes in the current mode.
        read decimals: i32 = "decimals";

        /// Name of the sensor driver.
        read driver_name: String = "driver_name";

        /// Current mode. Write one of `modes` to change it.
        read_write mode, set_mode: String = "mode";

        /// Valid modes for the sensor.
        read modes: ModeSet = "modes";

        /// Number of `value<N>` attributes valid in the current mode.
        read num_values: i32 = "num_values";

        /// Port the sensor is connected to, e.g. `in1`.
        ///
        /// I2C sensors also include the address, e.g. `in1:i2c8`.
        read port_name: String = "port_name";

        /// Units of the measured value in the current mode. May be empty.
        read units: String = "units";

        /// First measured value
        read value0: i32 = "value0";

        /// Second measured value
        read value1: i32 = "value1";

        /// Third measured value
        read value2: i32 = "value2";

        /// Fourth measured value
        read value3: i32 = "value3";

        /// Fifth measured value
        read value4: i32 = "value4";

        /// Sixth measured value
        read value5: i32 = "value5";

        /// Seventh measured value
        read value6: i32 = "value6";

        /// Eighth measured value
        read value7: i32 = "value7";

        /// Measured value `index`, `0..num_values`.
        fn value(&self, index: u32) -> Result<i32> {
            self.handle().get(&format!("value{index}"))
        }

        /// Measured value `index`, scaled by `decimals`.
        fn float_value(&self, index: u32) -> Result<f32> {
            let value = self.value(index)?;
            Ok(value as f32 / 10f32.powi(self.decimals()?))
        }

        /// Human readable name of the connected sensor.
        ///
        /// Falls back to the driver name for unknown drivers.
        fn type_name(&self) -> Result<String> {
            let driver = self.driver_name()?;
            Ok(driver_type_name(&driver).map(str::to_owned).unwrap_or(driver))
        }
    }
}

attributes! {
    /// Attributes of I2C sensors.
    pub trait I2cSensorAttributes: SensorAttributes {
        /// Firmware version of the sensor, if available.
        read fw_version: String = "fw_version";

        /// Polling period in milliseconds.
        ///
        /// Writing 0 disables polling, the minimum is 50. Unavailable if the
        /// driver can't change polling.
        read_write poll_ms, set_poll_ms: i32 = "poll_ms";
    }
}

value_enum! {
    /// EV3 color sensor modes
    pub enum ColorMode("mode") {
        /// Reflected light. Red LED on.
        Reflect = "COL-REFLECT",

        /// Ambient light. Red LEDs off.
        Ambient = "COL-AMBIENT",

        /// Color. All LEDs rapidly cycling, appears white.
        Color = "COL-COLOR",

        /// Raw reflected. Red LED on.
        RefRaw = "REF-RAW",

        /// Raw color components. All LEDs rapidly cycling, appears white.
        RgbRaw = "RGB-RAW",
    }
}

value_enum! {
    /// EV3 ultrasonic sensor modes
    pub enum UltrasonicMode("mode") {
        /// Continuous measurement in centimeters. LEDs on, steady.
        DistCm = "US-DIST-CM",

        /// Continuous measurement in inches. LEDs on, steady.
        DistIn = "US-DIST-IN",

        /// Listen. LEDs on, blinking.
        Listen = "US-LISTEN",

        /// Single measurement in centimeters.
        SingleCm = "US-SI-CM",

        /// Single measurement in inches.
        SingleIn = "US-SI-IN",
    }
}

value_enum! {
    /// EV3 gyro sensor modes
    pub enum GyroMode("mode") {
        /// Angle
        Angle = "GYRO-ANG",

        /// Rotational speed
        Rate = "GYRO-RATE",

        /// Raw sensor value
        Raw = "GYRO-FAS",

        /// Angle and rotational speed
        AngleAndRate = "GYRO-G&A",

        /// Calibration
        Calibrate = "GYRO-CAL",
    }
}

value_enum! {
    /// EV3 infrared sensor modes
    pub enum InfraredMode("mode") {
        /// Proximity
        Proximity = "IR-PROX",

        /// IR seeker
        Seek = "IR-SEEK",

        /// IR remote control
        Remote = "IR-REMOTE",

        /// IR remote control, button state coded in binary
        RemoteBinary = "IR-REM-A",

        /// Calibration
        Calibrate = "IR-CAL",
    }
}

value_enum! {
    /// NXT sound sensor modes
    pub enum SoundMode("mode") {
        /// Sound pressure level, flat weighting
        Db = "DB",

        /// Sound pressure level, A weighting
        Dba = "DBA",
    }
}

value_enum! {
    /// NXT light sensor modes
    pub enum LightMode("mode") {
        /// Reflected light, LED on
        Reflect = "REFLECT",

        /// Ambient light, LED off
        Ambient = "AMBIENT",
    }
}

device! {
    /// Any `lego-sensor` device
    pub struct Sensor {
        class: "lego-sensor",
        pattern: "sensor*",
        drivers: [],
        attributes: [SensorAttributes],
    }
}

device! {
    /// A generic I2C sensor
    pub struct I2cSensor {
        class: "lego-sensor",
        pattern: "sensor*",
        drivers: [NXT_I2C_SENSOR],
        attributes: [SensorAttributes, I2cSensorAttributes],
    }
}

device! {
    /// EV3 or NXT touch sensor
    pub struct TouchSensor {
        class: "lego-sensor",
        pattern: "sensor*",
        drivers: [EV3_TOUCH, NXT_TOUCH],
        attributes: [SensorAttributes],
    }
}

device! {
    /// EV3 color sensor
    pub struct ColorSensor {
        class: "lego-sensor",
        pattern: "sensor*",
        drivers: [EV3_COLOR],
        attributes: [SensorAttributes],
    }
}

device! {
    /// EV3 or NXT ultrasonic sensor
    pub struct UltrasonicSensor {
        class: "lego-sensor",
        pattern: "sensor*",
        drivers: [EV3_ULTRASONIC, NXT_ULTRASONIC],
        attributes: [SensorAttributes],
    }
}

device! {
    /// EV3 gyro sensor
    pub struct GyroSensor {
        class: "lego-sensor",
        pattern: "sensor*",
        drivers: [EV3_GYRO],
        attributes: [SensorAttributes],
    }
}

device! {
    /// EV3 infrared sensor
    pub struct InfraredSensor {
        class: "lego-sensor",
        pattern: "sensor*",
        drivers: [EV3_INFRARED],
        attributes: [SensorAttributes],
    }
}

device! {
    /// NXT sound sensor
    pub struct SoundSensor {
        class: "lego-sensor",
        pattern: "sensor*",
        drivers: [NXT_SOUND],
        attributes: [SensorAttributes],
    }
}

device! {
    /// NXT light sensor
    pub struct LightSensor {
        class: "lego-sensor",
        pattern: "sensor*",
        drivers: [NXT_LIGHT],
        attributes: [SensorAttributes],
    }
}

/// Typed `mode` accessors, shadowing the [`SensorAttributes`] ones.
macro_rules! typed_mode {
    ($($sensor:ident => $mode:ident),+ $(,)?) => {$(
        impl $sensor {
            /// Current mode
            pub fn mode(&self) -> Result<$mode> {
                self.handle().get("mode")
            }

            /// Switch to `mode`
            pub fn set_mode(&self, mode: $mode) -> Result<()> {
                self.handle().set("mode", &mode)
            }
        }
    )+};
}

typed_mode! {
    ColorSensor => ColorMode,
    UltrasonicSensor => UltrasonicMode,
    GyroSensor => GyroMode,
    InfraredSensor => InfraredMode,
    SoundSensor => SoundMode,
    LightSensor => LightMode,
}

impl I2cSensor {
    /// Claim the I2C sensor at `address` on input port `port`.
    ///
    /// I2C sensors report a `port_name` of `<port>:i2c<address>`, with the
    /// address in decimal, as in `in1:i2c8`.
    ///
    /// # Errors
    ///
    /// - [`DeviceNotFound`][crate::error::DeviceError::DeviceNotFound] if
    ///   there is no such sensor
    pub fn with_address(registry: &Registry, port: &str, address: &str) -> Result<Self> {
        Self::new(registry, Port::connected(format!("{port}:i2c{address}")))
    }
}
