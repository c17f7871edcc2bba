//! Fake ev3dev sysfs trees for tests
use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::registry::Registry;

/// A class root in a temporary directory, with a [`Registry`] over it.
pub(crate) struct FakeSysfs {
    dir: TempDir,
    registry: Registry,
}

impl FakeSysfs {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("couldn't create temporary directory");
        let registry = Registry::with_root(dir.path());
        Self { dir, registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Create `class/name` with the given attribute files.
    ///
    /// Files get a trailing newline, like the kernel's.
    pub fn device(&self, class: &str, name: &str, attrs: &[(&str, &str)]) -> PathBuf {
        let path = self.root().join(class).join(name);
        fs::create_dir_all(&path).expect("couldn't create device directory");
        for (attr, value) in attrs {
            let file = path.join(attr);
            if let Some(parent) = file.parent() {
                fs::create_dir_all(parent).expect("couldn't create attribute directory");
            }
            fs::write(file, format!("{value}\n")).expect("couldn't write attribute");
        }
        path
    }

    /// Contents of an attribute file, as written.
    pub fn read(&self, path: &Path, attr: &str) -> String {
        fs::read_to_string(path.join(attr)).expect("couldn't read attribute")
    }

    pub fn tacho_motor(&self, name: &str) -> PathBuf {
        self.device(
            "tacho-motor",
            name,
            &[
                ("command", ""),
                ("commands", "run-forever run-to-abs-pos run-to-rel-pos run-timed run-direct stop reset"),
                ("count_per_rot", "360"),
                ("driver_name", "lego-ev3-l-motor"),
                ("duty_cycle", "0"),
                ("duty_cycle_sp", "0"),
                ("encoder_polarity", "normal"),
                ("polarity", "normal"),
                ("port_name", "outA"),
                ("position", "0"),
                ("hold_pid/Kp", "0"),
                ("hold_pid/Ki", "0"),
                ("hold_pid/Kd", "0"),
                ("position_sp", "0"),
                ("speed", "0"),
                ("speed_sp", "0"),
                ("ramp_up_sp", "0"),
                ("ramp_down_sp", "0"),
                ("speed_regulation", "off"),
                ("speed_pid/Kp", "1000"),
                ("speed_pid/Ki", "60"),
                ("speed_pid/Kd", "0"),
                ("state", ""),
                ("stop_command", "coast"),
                ("stop_commands", "coast brake hold"),
                ("time_sp", "0"),
            ],
        )
    }

    pub fn sensor(&self, name: &str, driver: &str, port: &str, modes: &str) -> PathBuf {
        let mode = modes.split_whitespace().next().unwrap_or_default();
        let path = self.device(
            "lego-sensor",
            name,
            &[
                ("command", ""),
                ("commands", ""),
                ("decimals", "0"),
                ("driver_name", driver),
                ("mode", mode),
                ("modes", modes),
                ("num_values", "1"),
                ("port_name", port),
                ("units", ""),
            ],
        );
        for i in 0..8 {
            fs::write(path.join(format!("value{i}")), "0\n").expect("couldn't write value");
        }
        path
    }
}
