use gpui::{App, IntoElement, RenderOnce, SharedString, Window};
use gpui_component::{Icon, IconNamed};

#[derive(IntoElement, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnowIconName {
    AlignCenter,
    AlignJustify,
    AlignLeft,
    AlignRight,
    Baseline,
    Bold,
    ChevronDown,
    CodeXml,
    Eraser,
    Film,
    Heading1,
    Heading2,
    Heading3,
    Image,
    IndentDecrease,
    IndentIncrease,
    Italic,
    Link,
    List,
    ListOrdered,
    ListTodo,
    PaintBucket,
    PilcrowLeft,
    PilcrowRight,
    Quote,
    Sigma,
    SquareCode,
    Strikethrough,
    Subscript,
    Superscript,
    Underline,
}

impl SnowIconName {
    const ALL: [Self; 31] = [
        Self::AlignCenter,
        Self::AlignJustify,
        Self::AlignLeft,
        Self::AlignRight,
        Self::Baseline,
        Self::Bold,
        Self::ChevronDown,
        Self::CodeXml,
        Self::Eraser,
        Self::Film,
        Self::Heading1,
        Self::Heading2,
        Self::Heading3,
        Self::Image,
        Self::IndentDecrease,
        Self::IndentIncrease,
        Self::Italic,
        Self::Link,
        Self::List,
        Self::ListOrdered,
        Self::ListTodo,
        Self::PaintBucket,
        Self::PilcrowLeft,
        Self::PilcrowRight,
        Self::Quote,
        Self::Sigma,
        Self::SquareCode,
        Self::Strikethrough,
        Self::Subscript,
        Self::Superscript,
        Self::Underline,
    ];

    fn asset_path(self) -> &'static str {
        match self {
            Self::AlignCenter => "icons/align-center.svg",
            Self::AlignJustify => "icons/align-justify.svg",
            Self::AlignLeft => "icons/align-left.svg",
            Self::AlignRight => "icons/align-right.svg",
            Self::Baseline => "icons/baseline.svg",
            Self::Bold => "icons/bold.svg",
            Self::ChevronDown => "icons/chevron-down.svg",
            Self::CodeXml => "icons/code-xml.svg",
            Self::Eraser => "icons/eraser.svg",
            Self::Film => "icons/film.svg",
            Self::Heading1 => "icons/heading-1.svg",
            Self::Heading2 => "icons/heading-2.svg",
            Self::Heading3 => "icons/heading-3.svg",
            Self::Image => "icons/image.svg",
            Self::IndentDecrease => "icons/indent-decrease.svg",
            Self::IndentIncrease => "icons/indent-increase.svg",
            Self::Italic => "icons/italic.svg",
            Self::Link => "icons/link.svg",
            Self::List => "icons/list.svg",
            Self::ListOrdered => "icons/list-ordered.svg",
            Self::ListTodo => "icons/list-todo.svg",
            Self::PaintBucket => "icons/paint-bucket.svg",
            Self::PilcrowLeft => "icons/pilcrow-left.svg",
            Self::PilcrowRight => "icons/pilcrow-right.svg",
            Self::Quote => "icons/quote.svg",
            Self::Sigma => "icons/sigma.svg",
            Self::SquareCode => "icons/square-code.svg",
            Self::Strikethrough => "icons/strikethrough.svg",
            Self::Subscript => "icons/subscript.svg",
            Self::Superscript => "icons/superscript.svg",
            Self::Underline => "icons/underline.svg",
        }
    }

    /// Map an icon bundle path back to its glyph.
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|icon| icon.asset_path() == path)
    }
}

impl IconNamed for SnowIconName {
    fn path(self) -> SharedString {
        self.asset_path().into()
    }
}

impl RenderOnce for SnowIconName {
    fn render(self, _: &mut Window, _: &mut App) -> impl IntoElement {
        Icon::new(self)
    }
}
