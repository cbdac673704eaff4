use core::fmt::{self, Display, Formatter};
use regex::Regex;
use std::sync::LazyLock;

/// Positional wheel filename grammar.
///
/// Every field is matched lazily from the left so that an absent build tag shifts the
/// remaining four trailing fields left instead of swallowing the interpreter tag.
static WHEEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)-(.+?)(?:-(.+?))?-(.+?)-(.+?)-(.+?)\.whl$").expect("invalid regex"));

/// The structured fields encoded in a wheel filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WheelName {
    pub name: String,
    pub version: String,
    pub build_tag: Option<String>,
    pub python_tag: String,
    pub abi_tag: String,
    pub platform_tag: String,
}

impl WheelName {
    /// Parse a wheel filename, returning `None` when it does not follow the grammar.
    #[must_use]
    pub fn parse(filename: &str) -> Option<Self> {
        let caps = WHEEL_REGEX.captures(filename)?;
        let field = |index: usize| caps.get(index).map(|m| m.as_str().to_string());

        Some(Self {
            name: field(1)?,
            version: field(2)?,
            build_tag: field(3),
            python_tag: field(4)?,
            abi_tag: field(5)?,
            platform_tag: field(6)?,
        })
    }

    /// The `python-abi-platform` compatibility triple.
    #[must_use]
    pub fn compatibility(&self) -> String {
        format!("{}-{}-{}", self.python_tag, self.abi_tag, self.platform_tag)
    }
}

impl Display for WheelName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.version)?;
        if let Some(build) = &self.build_tag {
            write!(f, "-{build}")?;
        }
        write!(f, "-{}.whl", self.compatibility())
    }
}
