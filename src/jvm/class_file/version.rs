use super::Serialize;
use byteorder::WriteBytesExt;
use std::io::Result;

/// Version of the class file, which is used to verify that the JVM has the
/// necessary features to interpret the class
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Version {
    pub major_version: u16,
    pub minor_version: u16,
}

impl Version {
    /// Java SE 6, the first release whose class files may carry a `StackMapTable`
    pub const JAVA6: Version = Version::major(50);

    /// Java SE 7, which introduced method handle constants
    pub const JAVA7: Version = Version::major(51);

    /// Java SE 8 (released March 2014)
    pub const JAVA8: Version = Version::major(52);

    pub const JAVA11: Version = Version::major(55);

    pub const JAVA17: Version = Version::major(61);

    const fn major(major_version: u16) -> Version {
        Version {
            major_version,
            minor_version: 0,
        }
    }

    /// Class file version for a Java SE release number (`6` through `17`)
    pub fn from_java(release: u16) -> Option<Version> {
        if (6..=17).contains(&release) {
            Some(Version::major(release + 44))
        } else {
            None
        }
    }

    /// Whether `ldc` can push `MethodHandle` constants
    pub fn supports_method_handles(&self) -> bool {
        *self >= Version::JAVA7
    }
}

impl Serialize for Version {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        self.minor_version.serialize(writer)?;
        self.major_version.serialize(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn java_releases() {
        assert_eq!(Version::from_java(8), Some(Version::JAVA8));
        assert_eq!(Version::from_java(17), Some(Version::JAVA17));
        assert_eq!(Version::from_java(5), None);
        assert!(!Version::JAVA6.supports_method_handles());
        assert!(Version::JAVA11.supports_method_handles());
    }
}
