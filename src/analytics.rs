/// Page-analytics hook. Events go out as structured `tracing` records on the
/// `contactkit::analytics` target so any subscriber can forward them.
pub fn track_event(category: &str, action: &str) {
    tracing::info!(target: "contactkit::analytics", category, action, "event tracked");
}
