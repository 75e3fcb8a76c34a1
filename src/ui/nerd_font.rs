/// Curated nerd font icons used in apodwall output and menus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NerdFont {
    // Status and feedback
    Check,
    Cross,
    Warning,
    Info,

    // Files and folders
    Folder,
    File,
    Download,
    Image,

    // System
    Desktop,
    Key,

    // Content
    Star,
    Calendar,
    Globe,
    List,
    Refresh,
    Exit,
}

impl NerdFont {
    pub fn unicode(self) -> char {
        match self {
            Self::Check => '\u{f00c}',    // fa-check
            Self::Cross => '\u{f00d}',    // fa-times
            Self::Warning => '\u{f071}',  // fa-exclamation-triangle
            Self::Info => '\u{f05a}',     // fa-info-circle
            Self::Folder => '\u{f07b}',   // fa-folder
            Self::File => '\u{f15b}',     // fa-file
            Self::Download => '\u{f019}', // fa-download
            Self::Image => '\u{f03e}',    // fa-image
            Self::Desktop => '\u{f108}',  // fa-desktop
            Self::Key => '\u{f084}',      // fa-key
            Self::Star => '\u{f005}',     // fa-star
            Self::Calendar => '\u{f073}', // fa-calendar
            Self::Globe => '\u{f0ac}',    // fa-globe
            Self::List => '\u{f03a}',     // fa-list
            Self::Refresh => '\u{f021}',  // fa-refresh
            Self::Exit => '\u{f08b}',     // fa-sign-out
        }
    }
}

impl From<NerdFont> for char {
    fn from(icon: NerdFont) -> Self {
        icon.unicode()
    }
}

impl From<NerdFont> for String {
    fn from(icon: NerdFont) -> Self {
        icon.unicode().to_string()
    }
}
