//! Finding and claiming devices
//!
//! ev3dev names devices by registration order, `motor0`, `motor1`, ...,
//! which has nothing to do with the port they're plugged into.
//! A [`Registry`] scans a class directory for the first entry matching a
//! name pattern and claims it, so two device objects never drive the same
//! hardware.
//!
//! # Examples
//!
//! ```rust,no_run
//! # use ev3dev_sysfs::{prelude::*, registry::*};
//! let registry = Registry::new();
//! let left = LargeMotor::new(&registry, Port::connected(OUTPUT_B)).unwrap();
//! let right = LargeMotor::new(&registry, Port::connected(OUTPUT_C)).unwrap();
//! left.run_forever().unwrap();
//! right.run_forever().unwrap();
//! ```
use std::{
    collections::HashSet,
    env,
    fs,
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use glob::{Pattern, PatternError};

use crate::{class::DeviceHandle, error::DeviceError, Result};

pub use crate::util::{CLASS_PATH, CLASS_PATH_ENV};

/// Sensor port 1
pub const INPUT_1: &str = "in1";

/// Sensor port 2
pub const INPUT_2: &str = "in2";

/// Sensor port 3
pub const INPUT_3: &str = "in3";

/// Sensor port 4
pub const INPUT_4: &str = "in4";

/// Motor port A
pub const OUTPUT_A: &str = "outA";

/// Motor port B
pub const OUTPUT_B: &str = "outB";

/// Motor port C
pub const OUTPUT_C: &str = "outC";

/// Motor port D
pub const OUTPUT_D: &str = "outD";

/// Which device to bind to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Port {
    /// The first free device matching the type's default pattern
    #[default]
    Auto,

    /// The first free device whose kernel name matches this glob, or is
    /// exactly this name.
    Name(String),

    /// The first free device whose `port_name` is this, like [`OUTPUT_A`]
    Connected(String),
}

impl Port {
    /// [`Port::Name`]
    pub fn name<S: Into<String>>(name: S) -> Self {
        Self::Name(name.into())
    }

    /// [`Port::Connected`]
    pub fn connected<S: Into<String>>(port_name: S) -> Self {
        Self::Connected(port_name.into())
    }
}

/// Requires attribute `attribute` of a candidate device to be one of
/// `values`.
#[derive(Debug, Clone, Copy)]
pub struct Filter<'a> {
    /// Attribute to read
    pub attribute: &'a str,

    /// Accepted contents, compared after trimming
    pub values: &'a [&'a str],
}

impl<'a> Filter<'a> {
    /// Filter on `attribute` being one of `values`
    pub fn new(attribute: &'a str, values: &'a [&'a str]) -> Self {
        Self { attribute, values }
    }

    /// Whether the device at `path` passes.
    ///
    /// Unreadable attributes never pass.
    fn accepts(&self, path: &Path) -> bool {
        match fs::read_to_string(path.join(self.attribute)) {
            Ok(s) => self.values.contains(&s.trim()),
            Err(_) => false,
        }
    }
}

#[derive(Debug)]
struct Inner {
    root: PathBuf,
    claimed: Mutex<HashSet<PathBuf>>,
}

/// Registry of claimed devices.
///
/// Cloning is cheap, and every clone shares the same claims.
/// Devices found through one registry know nothing of another.
#[derive(Debug, Clone)]
pub struct Registry {
    inner: Arc<Inner>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Registry for devices under [`CLASS_PATH`]
    pub fn new() -> Self {
        Self::with_root(CLASS_PATH)
    }

    /// Registry for devices under `root` instead of [`CLASS_PATH`]
    pub fn with_root<P: AsRef<Path>>(root: P) -> Self {
        Self {
            inner: Arc::new(Inner {
                root: root.as_ref().to_path_buf(),
                claimed: Mutex::new(HashSet::new()),
            }),
        }
    }

    /// Registry for devices under the path in [`CLASS_PATH_ENV`], or
    /// [`CLASS_PATH`] if it isn't set.
    pub fn from_env() -> Self {
        match env::var_os(CLASS_PATH_ENV) {
            Some(root) if !root.is_empty() => Self::with_root(root),
            _ => Self::new(),
        }
    }

    /// Device class root
    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    /// Whether the device directory at `path` is claimed
    pub fn is_claimed<P: AsRef<Path>>(&self, path: P) -> bool {
        self.claims().contains(path.as_ref())
    }

    /// Number of claimed devices
    pub fn claimed(&self) -> usize {
        self.claims().len()
    }

    /// Claim the first unclaimed device in `class` whose name matches
    /// `pattern` and that passes every filter.
    ///
    /// Entries are tried in directory order, which is unspecified.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::DeviceNotFound`] if no device qualifies, or `class`
    ///   doesn't exist.
    /// - [`DeviceError::InvalidPattern`] if `pattern` isn't a valid glob, and
    ///   no device is named exactly `pattern`.
    /// - [`DeviceError::Io`] if `class` couldn't be read.
    pub fn locate(&self, class: &str, pattern: &str, filters: &[Filter]) -> Result<DeviceHandle> {
        let matcher = Pattern::new(pattern);
        let dir = self.inner.root.join(class);
        let dir = if dir.is_absolute() {
            dir
        } else {
            env::current_dir()?.join(dir)
        };
        let not_found = || match &matcher {
            Ok(_) => DeviceError::DeviceNotFound {
                class: class.to_owned(),
                pattern: pattern.to_owned(),
            },
            Err(e) => DeviceError::InvalidPattern(PatternError {
                pos: e.pos,
                msg: e.msg,
            }),
        };
        let entries = match dir.read_dir() {
            Ok(e) => e,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name = match name.to_str() {
                Some(n) => n,
                None => continue,
            };
            if !(name == pattern || matcher.as_ref().map_or(false, |m| m.matches(name))) {
                continue;
            }
            let path = entry.path();
            if !filters.iter().all(|f| f.accepts(&path)) {
                continue;
            }
            if self.claims().insert(path.clone()) {
                tracing::debug!(class, path = %path.display(), "claimed device");
                return Ok(DeviceHandle::new(path, class, self.clone()));
            }
        }
        Err(not_found())
    }

    /// [`Registry::locate`] for a device type's constructor.
    ///
    /// `drivers`, if not empty, must contain the device's `driver_name`.
    pub(crate) fn find(
        &self,
        class: &str,
        pattern: &str,
        drivers: &[&str],
        port: &Port,
    ) -> Result<DeviceHandle> {
        let port_name;
        let mut filters = Vec::with_capacity(2);
        if !drivers.is_empty() {
            filters.push(Filter::new("driver_name", drivers));
        }
        let pattern = match port {
            Port::Auto => pattern,
            Port::Name(name) => name.as_str(),
            Port::Connected(name) => {
                port_name = [name.as_str()];
                filters.push(Filter::new("port_name", &port_name));
                pattern
            }
        };
        match (self.locate(class, pattern, &filters), port) {
            (Err(DeviceError::DeviceNotFound { class, .. }), Port::Connected(name)) => {
                Err(DeviceError::DeviceNotFound {
                    class,
                    pattern: format!("port {name}"),
                })
            }
            (r, _) => r,
        }
    }

    /// Drop the claim on `path`.
    ///
    /// Returns whether it was claimed.
    pub(crate) fn release(&self, path: &Path) -> bool {
        let released = self.claims().remove(path);
        if released {
            tracing::debug!(path = %path.display(), "released device");
        }
        released
    }

    fn claims(&self) -> MutexGuard<'_, HashSet<PathBuf>> {
        self.inner
            .claimed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
