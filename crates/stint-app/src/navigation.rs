use tracing::debug;

/// The logical location the routing layer displays. Purely cosmetic: marking
/// a location never causes a real navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Home,
    Create,
    Edit,
    Details,
    Delete,
}

impl Location {
    pub fn as_path(self) -> &'static str {
        match self {
            Location::Home => "/",
            Location::Create => "/add",
            Location::Edit => "/edit",
            Location::Details => "/details",
            Location::Delete => "/delete",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Location::Home),
            "/add" => Some(Location::Create),
            "/edit" => Some(Location::Edit),
            "/details" => Some(Location::Details),
            "/delete" => Some(Location::Delete),
            _ => None,
        }
    }

    /// Modal locations are transient markers set while a modal is open; they
    /// are never valid entry points.
    pub fn is_modal_only(self) -> bool {
        !matches!(self, Location::Home)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: Location,
}

impl Navigator {
    pub fn at_home() -> Self {
        Self {
            current: Location::Home,
        }
    }

    /// One-time startup correction: deep links into modal paths resume at
    /// home. Paths the shim does not manage also resume at home; rendering a
    /// not-found page for them is the routing layer's business.
    pub fn resume(path: &str) -> Self {
        match Location::from_path(path) {
            Some(location) if location.is_modal_only() => {
                debug!(path, "modal path is not a valid entry point; resuming at home");
                Self::at_home()
            }
            Some(location) => Self { current: location },
            None => Self::at_home(),
        }
    }

    pub fn current(&self) -> Location {
        self.current
    }

    /// Compare-and-set of the logical location; returns whether it changed.
    pub fn mark(&mut self, target: Location) -> bool {
        if self.current == target {
            return false;
        }
        debug!(
            from = self.current.as_path(),
            to = target.as_path(),
            "marking logical location"
        );
        self.current = target;
        true
    }
}
