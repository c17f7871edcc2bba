//! Abstraction for handling devices in the lego-port class
//!
//! # Implementation
//!
//! Input and output ports compatible with LEGO MINDSTORMS RCX/NXT/EV3, WeDo
//! and Power Functions devices, including the EV3 brick's own ports and
//! third party sensor multiplexers.
//!
//! Most ports detect what is plugged in. When they can't, set `mode` to how
//! the port should communicate, then `set_device` to the driver to load.
//! The mode must be set first.
//!
//! Ports are named `port<N>`, use `port_name` to find a specific one.
//!
//! See the [lego-port class][1] docs.
//!
//! [1]: https://docs.ev3dev.org/projects/lego-linux-drivers/en/ev3dev-jessie/ports.html
use crate::{attribute::ModeSet, class::Device};

attributes! {
    /// Attributes of the `lego-port` class.
    pub trait LegoPortAttributes: Device {
        /// Name of the driver that loaded this port.
        read driver_name: String = "driver_name";

        /// Available modes of the port.
        read modes: ModeSet = "modes";

        /// Current mode.
        ///
        /// Changing the mode generally removes any attached devices and loads
        /// new ones, depending on the driver.
        read_write mode, set_mode: String = "mode";

        /// Name of the port, like `in1` or `outA`.
        read port_name: String = "port_name";

        /// Register a device for the named driver on this port.
        ///
        /// Needed for devices that can't be detected, like NXT analog
        /// sensors. Unavailable if the mode doesn't support it.
        write set_device: String = "set_device";

        /// Port status.
        ///
        /// Usually the same as `mode`, ports with an `auto` mode may also
        /// report things like `no-device` or `error`.
        read status: String = "status";
    }
}

device! {
    /// An input or output port
    pub struct LegoPort {
        class: "lego-port",
        pattern: "port*",
        drivers: [],
        attributes: [LegoPortAttributes],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::DeviceError, registry::Port, testing::FakeSysfs};

    type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

    #[test]
    fn set_device() -> Result<()> {
        let sys = FakeSysfs::new();
        let path = sys.device(
            "lego-port",
            "port2",
            &[
                ("driver_name", "legoev3-input-port"),
                ("modes", "auto nxt-analog nxt-color nxt-i2c other-uart ev3-analog ev3-uart raw"),
                ("mode", "auto"),
                ("port_name", "in3"),
                ("set_device", ""),
                ("status", "no-device"),
            ],
        );
        let port = LegoPort::new(sys.registry(), Port::connected("in3"))?;

        assert!(port.modes()?.contains("nxt-analog"));
        assert_eq!(port.status()?, "no-device");
        port.set_mode("nxt-analog")?;
        port.set_device("lego-nxt-touch")?;
        assert_eq!(port.mode()?, "nxt-analog");
        assert_eq!(sys.read(&path, "set_device"), "lego-nxt-touch");
        assert!(matches!(
            port.get_attribute("set_device"),
            Err(DeviceError::AttributeUnavailable { .. })
        ));
        Ok(())
    }
}
