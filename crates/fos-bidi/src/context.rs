//! Surrounding text used only as resolution context

use crate::class::BidiClass;

/// Prologue and epilogue text around a paragraph.
///
/// Only the prologue text after its last paragraph separator and the epilogue
/// text before its first one are kept; anything further away belongs to a
/// different paragraph.
#[derive(Debug, Clone, Copy, Default)]
pub struct Context<'a> {
    prologue: &'a [char],
    epilogue: &'a [char],
}

impl<'a> Context<'a> {
    /// No surrounding text
    pub const NONE: Context<'static> = Context {
        prologue: &[],
        epilogue: &[],
    };

    pub fn new(prologue: &'a [char], epilogue: &'a [char]) -> Self {
        let is_sep = |c: &char| BidiClass::of(*c) == BidiClass::B;
        let prologue = match prologue.iter().rposition(is_sep) {
            Some(pos) => &prologue[pos + 1..],
            None => prologue,
        };
        let epilogue = match epilogue.iter().position(is_sep) {
            Some(pos) => &epilogue[..pos],
            None => epilogue,
        };
        Self { prologue, epilogue }
    }

    pub fn prologue(&self) -> &'a [char] {
        self.prologue
    }

    pub fn epilogue(&self) -> &'a [char] {
        self.epilogue
    }

    /// Keep only the prologue
    pub fn leading(self) -> Self {
        Self { prologue: self.prologue, epilogue: &[] }
    }

    /// Keep only the epilogue
    pub fn trailing(self) -> Self {
        Self { prologue: &[], epilogue: self.epilogue }
    }

    /// Strong direction (L or R) of the last strong prologue character
    pub fn strong_before(&self) -> Option<BidiClass> {
        self.prologue
            .iter()
            .rev()
            .map(|&c| BidiClass::of(c))
            .find(|class| class.is_strong())
            .map(strong_to_lr)
    }

    /// Strong direction (L or R) of the first strong epilogue character
    pub fn strong_after(&self) -> Option<BidiClass> {
        self.epilogue
            .iter()
            .map(|&c| BidiClass::of(c))
            .find(|class| class.is_strong())
            .map(strong_to_lr)
    }
}

fn strong_to_lr(class: BidiClass) -> BidiClass {
    if class == BidiClass::L { BidiClass::L } else { BidiClass::R }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_context_trims_at_separators() {
        let pro = chars("abc\nאב");
        let epi = chars("de\nfg");
        let ctx = Context::new(&pro, &epi);
        assert_eq!(ctx.prologue(), &chars("אב")[..]);
        assert_eq!(ctx.epilogue(), &chars("de")[..]);
    }

    #[test]
    fn test_context_strong_types() {
        let pro = chars("abc אב 12");
        let epi = chars(" 3 ش x");
        let ctx = Context::new(&pro, &epi);
        assert_eq!(ctx.strong_before(), Some(BidiClass::R));
        assert_eq!(ctx.strong_after(), Some(BidiClass::R));
    }

    #[test]
    fn test_context_none() {
        assert_eq!(Context::NONE.strong_before(), None);
        assert_eq!(Context::NONE.strong_after(), None);
        let pro = chars("abc\n");
        assert!(Context::new(&pro, &[]).prologue().is_empty());
    }
}
