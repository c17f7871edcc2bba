//! Utility functions
use crate::error::{text::*, DeviceError};
use nix::errno::Errno;
use std::{io, path::Path};

/// ev3dev drivers register their devices under `/sys/class`.
///
/// Kept as a constant so alternative layouts, and tests, only need to
/// override it in one place. See [`crate::registry::Registry::with_root`].
pub const CLASS_PATH: &str = "/sys/class";

/// Environment variable consulted by [`crate::registry::Registry::from_env`]
pub const CLASS_PATH_ENV: &str = "EV3DEV_CLASS_PATH";

/// Classify an IO error from accessing `attribute` at `path`.
///
/// The kernel reports unsupported features with `EOPNOTSUPP`, and rejected
/// values with `EINVAL`.
pub(crate) fn attribute_error(attribute: &str, path: &Path, err: io::Error) -> DeviceError {
    let unavailable = |reason| DeviceError::AttributeUnavailable {
        attribute: attribute.to_owned(),
        path: path.to_owned(),
        reason,
    };
    match err.kind() {
        io::ErrorKind::NotFound => return unavailable(NOT_FOUND),
        io::ErrorKind::PermissionDenied => return unavailable(PERMISSION),
        _ => {}
    }
    match err.raw_os_error().map(Errno::from_i32) {
        Some(Errno::EOPNOTSUPP) => unavailable(NOT_SUPPORTED),
        Some(Errno::EISDIR) => unavailable(NOT_FOUND),
        _ => DeviceError::Io(err),
    }
}

/// Like [`attribute_error`], but `EINVAL` means the kernel rejected
/// `value`.
pub(crate) fn write_error(attribute: &str, path: &Path, value: &str, err: io::Error) -> DeviceError {
    if err.raw_os_error().map(Errno::from_i32) == Some(Errno::EINVAL) {
        return DeviceError::InvalidValue {
            attribute: attribute.to_owned(),
            value: value.to_owned(),
        };
    }
    attribute_error(attribute, path, err)
}

/// Trailing digits of a kernel name, as in `motor3` or `sensor10`.
pub(crate) fn trailing_index(name: &str) -> Option<u32> {
    let digits = name.len() - name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    name[name.len() - digits..].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index() {
        assert_eq!(trailing_index("motor3"), Some(3));
        assert_eq!(trailing_index("sensor10"), Some(10));
        assert_eq!(trailing_index("legoev3-battery"), None);
    }

    #[test]
    fn errno() {
        let path = Path::new("/sys/class/tacho-motor/motor0/polarity");
        let err = write_error(
            "polarity",
            path,
            "sideways",
            io::Error::from_raw_os_error(Errno::EINVAL as i32),
        );
        assert!(matches!(err, DeviceError::InvalidValue { .. }));

        let err = attribute_error(
            "poll_ms",
            path,
            io::Error::from_raw_os_error(Errno::EOPNOTSUPP as i32),
        );
        assert!(matches!(err, DeviceError::AttributeUnavailable { .. }));

        let err = attribute_error("speed", path, io::ErrorKind::NotFound.into());
        assert!(matches!(err, DeviceError::AttributeUnavailable { .. }));

        let err = attribute_error(
            "speed",
            path,
            io::Error::from_raw_os_error(Errno::ENODEV as i32),
        );
        assert!(matches!(err, DeviceError::Io(_)));
    }
}
