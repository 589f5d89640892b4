//! # Event Handler
//!
//! Routes task results to the controller that started them.
//!
//! An event is applied only when its mount id matches the controller that is
//! mounted right now. Anything else was produced by a controller that has
//! since been replaced and is dropped here.

use super::events::AppEvent;
use super::{App, MountedView};

pub(crate) trait AppEventHandler {
    fn handle_event_impl(&mut self, event: AppEvent);
}

impl AppEventHandler for App {
    fn handle_event_impl(&mut self, event: AppEvent) {
        let redirect = match (event, self.mounted.as_mut()) {
            (AppEvent::Auth { mount, event }, Some(MountedView::Auth(controller)))
                if controller.mount_id() == mount =>
            {
                controller.handle(event, &mut self.notifications)
            }
            (AppEvent::Catalog { mount, event }, Some(MountedView::Catalog(controller)))
                if controller.mount_id() == mount =>
            {
                controller.handle(event)
            }
            (stale, _) => {
                tracing::debug!(mount = %stale.mount(), "Discarding event from unmounted controller");
                None
            }
        };

        if let Some(route) = redirect {
            self.navigate(route);
        }
    }
}
