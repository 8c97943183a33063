use schedule_render::ScheduleMarkup;

/// Render target for the schedule list (`scheduleContainer`).
pub trait ScheduleView: Send + Sync {
    fn show_schedule(&self, markup: &ScheduleMarkup);
}
