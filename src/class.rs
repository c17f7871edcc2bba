//! Abstractions for handling the ev3dev device classes
//!
//! A "class" is a directory under `/sys/class` that the ev3dev drivers
//! register their devices in, like `tacho-motor` or `lego-sensor`.
//!
//! Every device is a directory of attribute files. Reading an attribute reads
//! the file, writing one writes the file. Nothing is cached, the driver is
//! always asked.
//!
//! See the [ev3dev docs][1] for details on each class.
//!
//! [1]: https://docs.ev3dev.org/projects/lego-linux-drivers/en/ev3dev-jessie/
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    attribute::{AttributeSpec, Value},
    error::{text::*, DeviceError},
    registry::Registry,
    util::{attribute_error, trailing_index, write_error},
    Result,
};

pub mod led;
pub mod motor;
pub mod port;
pub mod power_supply;
pub mod remote;
pub mod sensor;

pub(crate) mod imp {
    pub trait Sealed {}
}

/// One claimed device directory.
///
/// Only created by [`Registry::locate`], so a handle is always bound.
/// The claim is released when the handle is dropped, or explicitly with
/// [`DeviceHandle::release`].
#[derive(Debug)]
pub struct DeviceHandle {
    /// Absolute path to the device directory.
    path: PathBuf,

    /// Class directory name
    class: String,

    registry: Registry,
}

impl DeviceHandle {
    pub(crate) fn new(path: PathBuf, class: &str, registry: Registry) -> Self {
        Self {
            path,
            class: class.to_owned(),
            registry,
        }
    }

    /// Full path to the device
    ///
    /// # Example
    ///
    /// `/sys/class/tacho-motor/motor0`
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Class the device was found in
    ///
    /// # Example
    ///
    /// `tacho-motor`
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Read the contents of attribute `name`, minus the trailing newline.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::AttributeUnavailable`] if the attribute doesn't
    ///   exist, can't be read, or the driver doesn't support it.
    /// - [`DeviceError::Io`] for anything else, such as the device going
    ///   away.
    pub fn read_attribute(&self, name: &str) -> Result<String> {
        let path = self.path.join(name);
        let mut s = fs::read_to_string(&path).map_err(|e| attribute_error(name, &path, e))?;
        if s.ends_with('\n') {
            s.pop();
        }
        tracing::trace!(attribute = name, value = %s, "read");
        Ok(s)
    }

    /// Write `value` to attribute `name`, replacing its contents.
    ///
    /// The attribute file is never created.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::AttributeUnavailable`] as with
    ///   [`DeviceHandle::read_attribute`]
    /// - [`DeviceError::InvalidValue`] if the driver rejected `value`
    /// - [`DeviceError::Io`] for anything else
    pub fn write_attribute(&self, name: &str, value: &str) -> Result<()> {
        let path = self.path.join(name);
        tracing::trace!(attribute = name, value, "write");
        let mut f = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| attribute_error(name, &path, e))?;
        f.write_all(value.as_bytes())
            .map_err(|e| write_error(name, &path, value, e))
    }

    /// Read attribute `name` as a `T`
    pub fn get<T: Value>(&self, name: &str) -> Result<T> {
        T::parse(name, &self.read_attribute(name)?)
    }

    /// Write `value` to attribute `name`
    pub fn set<T: Value>(&self, name: &str, value: &T) -> Result<()> {
        self.write_attribute(name, &value.render())
    }

    /// Give up the claim on this device, so it can be found again.
    ///
    /// Equivalent to dropping the handle.
    pub fn release(self) {}
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        self.registry.release(&self.path);
    }
}

/// An ev3dev device
///
/// Exposes the attribute access common to every device class.
/// Class specific attributes are provided by the `*Attributes` traits.
pub trait Device: imp::Sealed {
    /// Attribute tables of this device type
    const TABLES: &'static [&'static [AttributeSpec]];

    /// The claimed device directory
    fn handle(&self) -> &DeviceHandle;

    /// Full path to the device
    ///
    /// # Example
    ///
    /// `/sys/class/lego-sensor/sensor0`
    fn path(&self) -> &Path {
        self.handle().path()
    }

    /// Kernel name of the device.
    ///
    /// # Example
    ///
    /// `sensor0`
    fn kernel_name(&self) -> &str {
        self.path()
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    /// The `N` in the kernel name `sensorN`, if there is one.
    ///
    /// This number has nothing to do with the port the device is plugged
    /// into, see `port_name` for that.
    fn device_index(&self) -> Option<u32> {
        trailing_index(self.kernel_name())
    }

    /// Look up attribute `name` in this device's tables
    fn spec(name: &str) -> Option<&'static AttributeSpec> {
        Self::TABLES
            .iter()
            .flat_map(|t| t.iter())
            .find(|a| a.name == name)
    }

    /// Read attribute `name` as text.
    ///
    /// Declared attributes must be readable. Undeclared ones are read as-is.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::AttributeUnavailable`] if `name` is write-only, or as
    ///   with [`DeviceHandle::read_attribute`]
    fn get_attribute(&self, name: &str) -> Result<String> {
        if let Some(spec) = Self::spec(name) {
            if !spec.access.readable() {
                return Err(DeviceError::AttributeUnavailable {
                    attribute: name.to_owned(),
                    path: self.path().join(name),
                    reason: WRITE_ONLY,
                });
            }
        }
        self.handle().read_attribute(name)
    }

    /// Write `value` to attribute `name`.
    ///
    /// Declared attributes must be writable, and `value` must fit their
    /// domain. Undeclared ones are written as-is.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::AttributeUnavailable`] if `name` is read-only, or as
    ///   with [`DeviceHandle::write_attribute`]
    /// - [`DeviceError::InvalidValue`] if `value` isn't one of the valid
    ///   tokens, or isn't an integer for integer attributes.
    fn set_attribute(&self, name: &str, value: &str) -> Result<()> {
        if let Some(spec) = Self::spec(name) {
            if !spec.access.writable() {
                return Err(DeviceError::AttributeUnavailable {
                    attribute: name.to_owned(),
                    path: self.path().join(name),
                    reason: READ_ONLY,
                });
            }
            if !spec.domain.admits(value) {
                return Err(DeviceError::InvalidValue {
                    attribute: name.to_owned(),
                    value: value.to_owned(),
                });
            }
        }
        self.handle().write_attribute(name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        class::motor::{TachoMotor, TachoMotorAttributes},
        registry::Port,
        testing::FakeSysfs,
    };

    type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

    #[test]
    fn round_trip() -> Result<()> {
        let sys = FakeSysfs::new();
        sys.tacho_motor("motor0");
        let motor = TachoMotor::new(sys.registry(), Port::Auto)?;

        motor.set_attribute("duty_cycle_sp", "50")?;
        assert_eq!(motor.get_attribute("duty_cycle_sp")?, "50");

        motor.set_duty_cycle_sp(-30)?;
        assert_eq!(motor.duty_cycle_sp()?, -30);
        Ok(())
    }

    #[test]
    fn no_cache() -> Result<()> {
        let sys = FakeSysfs::new();
        let path = sys.tacho_motor("motor0");
        let motor = TachoMotor::new(sys.registry(), Port::Auto)?;

        assert_eq!(motor.position()?, 0);
        fs::write(path.join("position"), "1234\n")?;
        assert_eq!(motor.position()?, 1234);
        Ok(())
    }

    #[test]
    fn direction() -> Result<()> {
        let sys = FakeSysfs::new();
        sys.tacho_motor("motor0");
        let motor = TachoMotor::new(sys.registry(), Port::Auto)?;

        assert!(matches!(
            motor.set_attribute("speed", "100"),
            Err(DeviceError::AttributeUnavailable { .. })
        ));
        assert!(matches!(
            motor.get_attribute("command"),
            Err(DeviceError::AttributeUnavailable { .. })
        ));
        Ok(())
    }

    #[test]
    fn invalid_value() -> Result<()> {
        let sys = FakeSysfs::new();
        let path = sys.tacho_motor("motor0");
        let motor = TachoMotor::new(sys.registry(), Port::Auto)?;

        assert!(matches!(
            motor.set_attribute("polarity", "sideways"),
            Err(DeviceError::InvalidValue { .. })
        ));
        assert!(matches!(
            motor.set_attribute("time_sp", "soon"),
            Err(DeviceError::InvalidValue { .. })
        ));
        assert_eq!(fs::read_to_string(path.join("polarity"))?, "normal\n");
        Ok(())
    }

    #[test]
    fn missing_attribute() -> Result<()> {
        let sys = FakeSysfs::new();
        let path = sys.tacho_motor("motor0");
        let motor = TachoMotor::new(sys.registry(), Port::Auto)?;

        fs::remove_file(path.join("speed_sp"))?;
        assert!(matches!(
            motor.speed_sp(),
            Err(DeviceError::AttributeUnavailable { .. })
        ));
        assert!(matches!(
            motor.set_speed_sp(10),
            Err(DeviceError::AttributeUnavailable { .. })
        ));
        assert!(!path.join("speed_sp").exists());
        Ok(())
    }

    #[test]
    fn device_gone() -> Result<()> {
        let sys = FakeSysfs::new();
        let path = sys.tacho_motor("motor0");
        let motor = TachoMotor::new(sys.registry(), Port::Auto)?;

        fs::remove_dir_all(&path)?;
        assert!(matches!(
            motor.speed(),
            Err(DeviceError::AttributeUnavailable { .. } | DeviceError::Io(_))
        ));
        assert!(matches!(
            motor.run_forever(),
            Err(DeviceError::AttributeUnavailable { .. } | DeviceError::Io(_))
        ));
        Ok(())
    }

    #[test]
    fn identity() -> Result<()> {
        let sys = FakeSysfs::new();
        let path = sys.tacho_motor("motor7");
        let motor = TachoMotor::new(sys.registry(), Port::Auto)?;

        assert_eq!(motor.path(), path);
        assert!(motor.path().is_absolute());
        assert_eq!(motor.kernel_name(), "motor7");
        assert_eq!(motor.device_index(), Some(7));
        assert_eq!(motor.handle().class(), "tacho-motor");
        Ok(())
    }
}
