use crate::jvm::class_file::Version;
use crate::jvm::{BinaryName, Name, UnqualifiedName};
use crate::Error;

pub struct Settings {
    /// Output class name, written as `my/output/Klass`
    pub output_class_name: BinaryName,

    /// Class file version to emit
    ///
    /// Method handle constants need at least Java 7.
    pub version: Version,

    /// Prefix of the synthetic static fields holding cached constants (eg. `cachedValue`)
    pub cached_field_prefix: UnqualifiedName,
}

impl Settings {
    pub fn new(output_class_name: impl Into<String>) -> Result<Settings, Error> {
        Ok(Settings {
            output_class_name: make_name(output_class_name)?,
            version: Version::JAVA8,
            cached_field_prefix: UnqualifiedName::CACHEDVALUE,
        })
    }

    /// Target a specific Java SE release (`6` through `17`)
    pub fn with_java_release(mut self, release: u16) -> Result<Settings, Error> {
        self.version = Version::from_java(release).ok_or_else(|| {
            Error::InvalidSettings(format!("unsupported Java release {}", release))
        })?;
        Ok(self)
    }

    pub fn with_cached_field_prefix(mut self, prefix: impl Into<String>) -> Result<Settings, Error> {
        self.cached_field_prefix = make_name(prefix)?;
        Ok(self)
    }
}

fn make_name<N: Name>(name: impl Into<String>) -> Result<N, Error> {
    N::from_string(name.into()).map_err(Error::InvalidSettings)
}
