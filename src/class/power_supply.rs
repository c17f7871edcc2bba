//! Abstraction for handling devices in the power_supply class
//!
//! # Implementation
//!
//! This is the generic Linux power supply class, see the [kernel docs][1].
//! On the EV3 the battery is `legoev3-battery`.
//!
//! Values are in micro-units.
//!
//! [1]: https://www.kernel.org/doc/Documentation/ABI/testing/sysfs-class-power
use crate::{class::Device, Result};

attributes! {
    /// Attributes of the `power_supply` class.
    pub trait PowerSupplyAttributes: Device {
        /// Current being supplied, in microamps.
        read measured_current: i32 = "current_now";

        /// Voltage being supplied, in microvolts.
        read measured_voltage: i32 = "voltage_now";

        /// Design maximum voltage, in microvolts.
        read max_voltage: i32 = "voltage_max_design";

        /// Design minimum voltage, in microvolts.
        read min_voltage: i32 = "voltage_min_design";

        /// Battery chemistry, like `Li-ion`.
        read technology: String = "technology";

        /// Supply type, like `Battery`.
        read supply_type: String = "type";

        /// Current being supplied, in amps.
        fn measured_amps(&self) -> Result<f32> {
            Ok(self.measured_current()? as f32 / 1_000_000.0)
        }

        /// Voltage being supplied, in volts.
        fn measured_volts(&self) -> Result<f32> {
            Ok(self.measured_voltage()? as f32 / 1_000_000.0)
        }
    }
}

device! {
    /// A power supply, the EV3 battery by default
    pub struct PowerSupply {
        class: "power_supply",
        pattern: "legoev3-battery",
        drivers: [],
        attributes: [PowerSupplyAttributes],
    }
}
