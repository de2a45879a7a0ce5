//! Page controls for the trade table.
//!
//! Layout for `page` of `total` (ellipses mark hidden page ranges):
//!
//! ```text
//! « ‹ 1 2 … [page] … last › »
//! ```

/// One rendered pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    First { disabled: bool },
    Prev { disabled: bool },
    Page { number: u32, active: bool },
    Ellipsis,
    Next { disabled: bool },
    Last { disabled: bool },
}

impl PageControl {
    /// The page this control navigates to from `page` of `total`, or `None`
    /// for disabled controls and ellipses.
    pub fn target(self, page: u32, total: u32) -> Option<u32> {
        match self {
            PageControl::First { disabled: false } => Some(1),
            PageControl::Prev { disabled: false } => Some(page.saturating_sub(1).max(1)),
            PageControl::Page { number, .. } => Some(number),
            PageControl::Next { disabled: false } => Some(page + 1),
            PageControl::Last { disabled: false } => Some(total),
            _ => None,
        }
    }

    pub fn is_enabled(self) -> bool {
        match self {
            PageControl::First { disabled }
            | PageControl::Prev { disabled }
            | PageControl::Next { disabled }
            | PageControl::Last { disabled } => !disabled,
            PageControl::Page { .. } => true,
            PageControl::Ellipsis => false,
        }
    }

    pub fn label(self) -> String {
        match self {
            PageControl::First { .. } => "«".into(),
            PageControl::Prev { .. } => "‹".into(),
            PageControl::Page { number, .. } => number.to_string(),
            PageControl::Ellipsis => "…".into(),
            PageControl::Next { .. } => "›".into(),
            PageControl::Last { .. } => "»".into(),
        }
    }
}

/// Controls to render for `page` of `total`. Empty when there is at most one
/// page.
pub fn controls(page: u32, total: u32) -> Vec<PageControl> {
    if total <= 1 {
        return Vec::new();
    }

    let on_first = page == 1;
    let on_last = page == total;
    let mut out = Vec::with_capacity(10);

    out.push(PageControl::First { disabled: on_first });
    out.push(PageControl::Prev { disabled: on_first });
    out.push(PageControl::Page { number: 1, active: on_first });
    out.push(PageControl::Page { number: 2, active: page == 2 });

    if total > 3 && page > 3 {
        out.push(PageControl::Ellipsis);
    }
    if page > 2 && page < total {
        out.push(PageControl::Page { number: page, active: true });
    }
    if total > 3 && page < total - 1 {
        out.push(PageControl::Ellipsis);
    }

    if total > 2 {
        out.push(PageControl::Page { number: total, active: on_last });
    }

    out.push(PageControl::Next { disabled: on_last });
    out.push(PageControl::Last { disabled: on_last });
    out
}

/// Resolve a navigation control kind against the current controls, honouring
/// their disabled state. Used by keyboard shortcuts.
pub fn navigate(page: u32, total: u32, wanted: Nav) -> Option<u32> {
    controls(page, total)
        .into_iter()
        .find(|c| wanted.matches(*c))
        .and_then(|c| c.target(page, total))
}

/// Keyboard-reachable navigation controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    First,
    Prev,
    Next,
    Last,
}

impl Nav {
    fn matches(self, control: PageControl) -> bool {
        matches!(
            (self, control),
            (Nav::First, PageControl::First { .. })
                | (Nav::Prev, PageControl::Prev { .. })
                | (Nav::Next, PageControl::Next { .. })
                | (Nav::Last, PageControl::Last { .. })
        )
    }
}
