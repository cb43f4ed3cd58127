//! Actions pages post for the shell to carry out.
//!
//! Pages never navigate or show toasts themselves; they post an
//! [`AppAction`] with `cx.action(..)` and the shell handles it in
//! `handle_actions`.

use std::time::Duration;

use makepad_widgets::*;
use pixrec_data::{Notification, Route};

#[derive(Clone, Debug, DefaultNone)]
pub enum AppAction {
    Navigate(Route),
    /// Navigate once `delay` has passed, unless the user left the page first
    NavigateAfter { route: Route, delay: Duration },
    Back,
    Notify(Notification),
    None,
}
