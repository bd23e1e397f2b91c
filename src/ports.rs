use tracing::{debug, warn};

use crate::constants::DEFAULT_PORT_PATTERNS;
use crate::error::{DeployError, DeployResult};

/// Finds the serial device a Flipper is attached to by expanding a
/// prioritised list of glob patterns
#[derive(Debug, Clone)]
pub struct PortResolver {
    patterns: Vec<String>,
}

impl Default for PortResolver {
    fn default() -> Self {
        Self::with_patterns(DEFAULT_PORT_PATTERNS)
    }
}

impl PortResolver {
    pub fn with_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PortResolver {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// An explicit port is used as-is, it is not checked for existence.
    /// Otherwise the first match of the first pattern with any match wins.
    pub fn resolve(&self, explicit: Option<&str>) -> DeployResult<String> {
        if let Some(port) = explicit {
            debug!("Using explicit port {}", port);
            return Ok(port.to_string());
        }

        match self.find_port()? {
            Some(port) => {
                debug!("Detected port {}", port);
                Ok(port)
            }
            None => Err(DeployError::PortNotFound {
                patterns: self.patterns.clone(),
                candidates: self.candidates()?,
            }),
        }
    }

    pub fn find_port(&self) -> DeployResult<Option<String>> {
        for pattern in &self.patterns {
            if let Some(first) = expand(pattern)?.into_iter().next() {
                return Ok(Some(first));
            }
        }
        Ok(None)
    }

    /// Every path matching any pattern, followed by the serial ports the
    /// OS reports. Used for listing and for the not-found diagnostic.
    pub fn candidates(&self) -> DeployResult<Vec<String>> {
        let mut candidates = Vec::new();
        for pattern in &self.patterns {
            candidates.extend(expand(pattern)?);
        }

        match serialport::available_ports() {
            Ok(ports) => candidates.extend(ports.into_iter().map(|port| port.port_name)),
            Err(e) => warn!("Could not get available ports. Err {:?}", e),
        }

        let mut seen = std::collections::HashSet::new();
        candidates.retain(|port| seen.insert(port.clone()));
        Ok(candidates)
    }
}

fn expand(pattern: &str) -> DeployResult<Vec<String>> {
    let paths = glob::glob(pattern).map_err(|e| {
        DeployError::ConfigurationError(format!("Invalid port pattern {}: {}", pattern, e))
    })?;

    // Entries that can't be read are skipped, same as a missing match
    Ok(paths
        .filter_map(Result::ok)
        .map(|path| path.to_string_lossy().into_owned())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_port_is_not_validated() {
        let resolver = PortResolver::with_patterns(Vec::<String>::new());
        let port = resolver.resolve(Some("/dev/does-not-exist")).unwrap();
        assert_eq!(port, "/dev/does-not-exist");
    }

    #[test]
    fn invalid_pattern_is_a_configuration_error() {
        let resolver = PortResolver::with_patterns(["/dev/tty[ACM"]);
        assert!(matches!(
            resolver.find_port(),
            Err(DeployError::ConfigurationError(_))
        ));
    }

    #[test]
    fn default_patterns_keep_priority_order() {
        let resolver = PortResolver::default();
        assert_eq!(
            resolver.patterns(),
            &["/dev/tty.usbmodem*".to_string(), "/dev/ttyACM*".to_string()]
        );
    }
}
