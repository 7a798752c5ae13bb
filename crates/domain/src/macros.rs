//! `Display`/`FromStr` for unit enums that appear in config and env vars
//!
//! ```rust
//! use play_domain::impl_str_enum;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum LogTarget {
//!     Stdout,
//!     Stderr,
//! }
//!
//! impl_str_enum!(LogTarget {
//!     Stdout => "stdout",
//!     Stderr => "stderr",
//! });
//!
//! assert_eq!("STDERR".parse::<LogTarget>(), Ok(LogTarget::Stderr));
//! assert_eq!(LogTarget::Stdout.to_string(), "stdout");
//! ```

/// Maps each variant to one lowercase name.
///
/// Parsing ignores case; the error lists the accepted names.
#[macro_export]
macro_rules! impl_str_enum {
    ($enum_name:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(match self {
                    $(Self::$variant => $name,)+
                })
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(format!(
                        "unknown {} '{}', expected one of: {}",
                        stringify!($enum_name),
                        s,
                        [$($name),+].join(", ")
                    )),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Backend {
        Memory,
        Sqlite,
    }

    impl_str_enum!(Backend {
        Memory => "memory",
        Sqlite => "sqlite",
    });

    #[test]
    fn displays_lowercase_name() {
        assert_eq!(Backend::Memory.to_string(), "memory");
        assert_eq!(format!("{:>8}", Backend::Sqlite), "  sqlite");
    }

    #[test]
    fn parses_ignoring_case_and_padding() {
        assert_eq!(" Sqlite ".parse::<Backend>(), Ok(Backend::Sqlite));
        assert_eq!("MEMORY".parse::<Backend>(), Ok(Backend::Memory));
    }

    #[test]
    fn rejection_lists_accepted_names() {
        let err = "mongo".parse::<Backend>().unwrap_err();
        assert_eq!(err, "unknown Backend 'mongo', expected one of: memory, sqlite");
        assert!("".parse::<Backend>().is_err());
    }
}
