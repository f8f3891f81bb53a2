//! Work coordinate system selection codes
//!
//! Controllers expose nine work coordinate systems: `G54` to `G59`,
//! followed by the extended `G59.1` to `G59.3`.

use crate::error::GcodeError;

/// Number of addressable work coordinate systems
pub const MAX_WORKPLACES: usize = 9;

/// Get the G-code that selects a zero-based work coordinate system
///
/// * `index` - 0 selects `G54`, 5 selects `G59`, 6..=8 select `G59.1`..`G59.3`
pub fn workplace_as_gcode(index: usize) -> Result<String, GcodeError> {
    match index {
        0..=5 => Ok(format!("G{}", 54 + index)),
        6..=8 => Ok(format!("G59.{}", index - 5)),
        _ => Err(GcodeError::InvalidWorkplace {
            index,
            max: MAX_WORKPLACES - 1,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_workplaces() {
        assert_eq!(workplace_as_gcode(0).unwrap(), "G54");
        assert_eq!(workplace_as_gcode(1).unwrap(), "G55");
        assert_eq!(workplace_as_gcode(5).unwrap(), "G59");
    }

    #[test]
    fn test_extended_workplaces() {
        assert_eq!(workplace_as_gcode(6).unwrap(), "G59.1");
        assert_eq!(workplace_as_gcode(7).unwrap(), "G59.2");
        assert_eq!(workplace_as_gcode(8).unwrap(), "G59.3");
    }

    #[test]
    fn test_out_of_range_workplace() {
        let err = workplace_as_gcode(9).unwrap_err();
        assert_eq!(err, GcodeError::InvalidWorkplace { index: 9, max: 8 });
    }
}
