//! Calendar controller: the application context tying storage, layout and
//! the drag-delete interaction to one rendered week.

use chrono::{Local, NaiveDate};

use crate::drag::{
    Confirm, DragDelete, DragError, DragState, Notifier, Point, Rect, Release, Resolution,
    SilentNotifier,
};
use crate::error::WeekGridResult;
use crate::event::{EventKey, EventRecord};
use crate::kv::KeyValueStore;
use crate::layout::GridMetrics;
use crate::store::{EventStore, LoadFailure};
use crate::view::WeekView;
use crate::week::WeekWindow;

/// Source of "today" for highlighting and for the initial week.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always returns the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// How a finished drag ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Released outside the trash; nothing changed
    DroppedElsewhere(EventKey),
    /// Released on the trash but the user said no
    Cancelled(EventKey),
    /// Removed from storage and from the view
    Deleted(EventKey),
}

pub struct CalendarController<S: KeyValueStore, C: Clock = SystemClock> {
    store: EventStore<S>,
    clock: C,
    metrics: GridMetrics,
    trash: Rect,
    view: WeekView,
    drag: DragDelete,
    notifier: Box<dyn Notifier>,
}

impl<S: KeyValueStore, C: Clock> CalendarController<S, C> {
    /// Create a controller showing an empty grid for the current week. Call
    /// `render` to fill it.
    pub fn new(store: EventStore<S>, clock: C, metrics: GridMetrics, trash: Rect) -> Self {
        let today = clock.today();
        let view = WeekView::new(WeekWindow::for_date(today), today, &metrics);

        CalendarController {
            store,
            clock,
            metrics,
            trash,
            view,
            drag: DragDelete::new(),
            notifier: Box::new(SilentNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn view(&self) -> &WeekView {
        &self.view
    }

    pub fn window(&self) -> WeekWindow {
        self.view.window()
    }

    pub fn store(&self) -> &EventStore<S> {
        &self.store
    }

    pub fn metrics(&self) -> &GridMetrics {
        &self.metrics
    }

    pub fn trash(&self) -> Rect {
        self.trash
    }

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    // RENDERING:

    /// Rebuild the grid for `window` from storage. Blocks from the previous
    /// render are discarded. Entries that could not be read are returned so
    /// the caller can report them; they do not stop the render.
    pub fn render(&mut self, window: WeekWindow) -> WeekGridResult<Vec<LoadFailure>> {
        tracing::debug!(%window, "rendering week");

        let report = self.store.load_all()?;
        let mut view = WeekView::new(window, self.clock.today(), &self.metrics);

        let placed = report
            .events
            .iter()
            .filter(|event| view.place(event, &self.metrics))
            .count();

        tracing::debug!(
            placed,
            skipped = report.events.len() - placed,
            failures = report.failures.len(),
            "week rendered"
        );

        self.view = view;
        Ok(report.failures)
    }

    /// Move the grid by `delta_weeks` and re-render.
    pub fn navigate(&mut self, delta_weeks: i64) -> WeekGridResult<Vec<LoadFailure>> {
        let window = self.window().shift(delta_weeks)?;
        self.render(window)
    }

    pub fn go_to_today(&mut self) -> WeekGridResult<Vec<LoadFailure>> {
        self.render(WeekWindow::for_date(self.clock.today()))
    }

    // EVENTS:

    /// Persist `event` and place it on the current grid without a full
    /// re-render. Returns whether it landed in the visible week.
    pub fn add_event(&mut self, event: &EventRecord) -> WeekGridResult<bool> {
        self.store.save(event)?;
        let placed = self.view.place(event, &self.metrics);

        tracing::debug!(key = %event.key(), placed, "event added");
        Ok(placed)
    }

    // DRAG TO DELETE:

    /// Pick up the block shown for `key`.
    pub fn drag_start(&mut self, key: &EventKey) -> WeekGridResult<()> {
        if !self.view.contains_block(key) {
            return Err(DragError::UnknownBlock(key.clone()).into());
        }
        self.drag.begin(key.clone())?;
        Ok(())
    }

    /// Release the dragged block at `point`. On the trash the interaction
    /// waits in `Confirming` for `confirm_drop`.
    pub fn drop_at(&mut self, point: Point) -> WeekGridResult<Release> {
        let release = self.drag.release(point, self.trash)?;

        if let Release::Elsewhere(key) = &release {
            tracing::debug!(%key, x = point.x, y = point.y, "dropped outside trash");
        }
        Ok(release)
    }

    /// Answer the pending confirmation. On yes the event is removed from
    /// storage and from the grid, then the notifier is told.
    pub fn confirm_drop(&mut self, confirmed: bool) -> WeekGridResult<DragOutcome> {
        match self.drag.resolve(confirmed)? {
            Resolution::Cancelled(key) => {
                tracing::debug!(%key, "deletion cancelled");
                Ok(DragOutcome::Cancelled(key))
            }
            Resolution::Committed(key) => {
                self.store.delete(&key)?;
                self.view.remove_block(&key);
                tracing::info!(%key, "event deleted");

                if let Err(e) = self.notifier.deleted(&key) {
                    tracing::warn!(%key, error = %e, "deletion notifier failed");
                }

                Ok(DragOutcome::Deleted(key))
            }
        }
    }

    /// `drop_at` followed by a blocking `confirm` call when needed.
    pub fn drag_end(
        &mut self,
        point: Point,
        confirm: &mut dyn Confirm,
    ) -> WeekGridResult<DragOutcome> {
        match self.drop_at(point)? {
            Release::Elsewhere(key) => Ok(DragOutcome::DroppedElsewhere(key)),
            Release::OnTrash(key) => {
                let answer = confirm.confirm(&key);
                self.confirm_drop(answer)
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::NotifyResult;
    use crate::error::WeekGridError;
    use crate::event::TimeOfDay;
    use crate::kv::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn event(title: &str, day: u32, start: &str, end: &str) -> EventRecord {
        EventRecord::new(
            title,
            date(day),
            TimeOfDay::parse(start).unwrap(),
            TimeOfDay::parse(end).unwrap(),
            "Spa",
        )
        .unwrap()
    }

    fn trash() -> Rect {
        Rect {
            left: 900,
            top: 0,
            right: 960,
            bottom: 40,
        }
    }

    fn controller() -> CalendarController<MemoryStore, FixedClock> {
        CalendarController::new(
            EventStore::new(MemoryStore::new()),
            FixedClock(date(19)),
            GridMetrics::default(),
            trash(),
        )
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier(Rc<RefCell<Vec<EventKey>>>);

    impl Notifier for RecordingNotifier {
        fn deleted(&mut self, key: &EventKey) -> NotifyResult {
            self.0.borrow_mut().push(key.clone());
            Ok(())
        }
    }

    struct FailingNotifier;

    impl Notifier for FailingNotifier {
        fn deleted(&mut self, _key: &EventKey) -> NotifyResult {
            Err("speaker unplugged".into())
        }
    }

    #[test]
    fn test_initial_window_is_current_week() {
        let controller = controller();
        assert_eq!(controller.window().first_day(), date(17));
        assert_eq!(controller.view().blocks().count(), 0);
    }

    #[test]
    fn test_render_includes_window_edges_only() {
        let mut controller = controller();
        for (title, day) in [("Sun before", 16), ("Mon", 17), ("Sun", 23), ("Mon after", 24)] {
            controller.add_event(&event(title, day, "09:00", "10:00")).unwrap();
        }

        controller.render(WeekWindow::for_date(date(20))).unwrap();

        let mut titles: Vec<_> = controller.view().blocks().map(|b| b.title.clone()).collect();
        titles.sort();
        assert_eq!(titles, vec!["Mon", "Sun"]);
    }

    #[test]
    fn test_navigate_rebuilds_view() {
        let mut controller = controller();
        controller.add_event(&event("This week", 18, "09:00", "10:00")).unwrap();
        controller.add_event(&event("Next week", 25, "09:00", "10:00")).unwrap();
        controller.render(controller.window()).unwrap();

        controller.navigate(1).unwrap();
        assert_eq!(controller.window().first_day(), date(24));
        let titles: Vec<_> = controller.view().blocks().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Next week"]);
        assert!(controller.view().columns().iter().all(|c| !c.is_today));

        controller.navigate(-1).unwrap();
        assert_eq!(controller.window().first_day(), date(17));
        assert!(controller.view().columns()[2].is_today);
    }

    #[test]
    fn test_navigate_out_of_range_keeps_current_week() {
        let mut controller = controller();
        controller.add_event(&event("This week", 18, "09:00", "10:00")).unwrap();
        controller.render(controller.window()).unwrap();

        assert!(matches!(
            controller.navigate(i64::MAX),
            Err(WeekGridError::DateOutOfRange(_))
        ));
        assert_eq!(controller.window().first_day(), date(17));
        assert_eq!(controller.view().blocks().count(), 1);
    }

    #[test]
    fn test_add_event_outside_window_is_stored_not_placed() {
        let mut controller = controller();
        let later = event("Later", 31, "09:00", "10:00");

        assert!(!controller.add_event(&later).unwrap());
        assert!(controller.store().contains(&later.key()).unwrap());
        assert_eq!(controller.view().blocks().count(), 0);
    }

    #[test]
    fn test_drag_to_trash_and_confirm_deletes() {
        let notifier = RecordingNotifier::default();
        let mut controller = controller().with_notifier(notifier.clone());
        let massage = event("Massage", 17, "09:00", "10:00");
        controller.add_event(&massage).unwrap();

        controller.drag_start(&massage.key()).unwrap();
        let outcome = controller
            .drag_end(Point::new(930, 20), &mut |_: &EventKey| true)
            .unwrap();

        assert_eq!(outcome, DragOutcome::Deleted(massage.key()));
        assert!(!controller.store().contains(&massage.key()).unwrap());
        assert!(!controller.view().contains_block(&massage.key()));
        assert_eq!(notifier.0.borrow().as_slice(), &[massage.key()]);
        assert_eq!(controller.drag_state(), &DragState::Idle);
    }

    #[test]
    fn test_drag_to_trash_and_decline_keeps_event() {
        let mut controller = controller();
        let massage = event("Massage", 17, "09:00", "10:00");
        controller.add_event(&massage).unwrap();

        controller.drag_start(&massage.key()).unwrap();
        let outcome = controller
            .drag_end(Point::new(900, 40), &mut |_: &EventKey| false)
            .unwrap();

        assert_eq!(outcome, DragOutcome::Cancelled(massage.key()));
        assert!(controller.store().contains(&massage.key()).unwrap());
        assert!(controller.view().contains_block(&massage.key()));
    }

    #[test]
    fn test_drop_elsewhere_never_asks() {
        let mut controller = controller();
        let massage = event("Massage", 17, "09:00", "10:00");
        controller.add_event(&massage).unwrap();

        let mut asked = false;
        controller.drag_start(&massage.key()).unwrap();
        let outcome = controller
            .drag_end(Point::new(10, 300), &mut |_: &EventKey| {
                asked = true;
                true
            })
            .unwrap();

        assert!(!asked);
        assert_eq!(outcome, DragOutcome::DroppedElsewhere(massage.key()));
        assert!(controller.store().contains(&massage.key()).unwrap());
        assert!(controller.view().contains_block(&massage.key()));
    }

    #[test]
    fn test_pending_confirmation_blocks_new_drag() {
        let mut controller = controller();
        let first = event("First", 17, "09:00", "10:00");
        let second = event("Second", 18, "09:00", "10:00");
        controller.add_event(&first).unwrap();
        controller.add_event(&second).unwrap();

        controller.drag_start(&first.key()).unwrap();
        controller.drop_at(Point::new(930, 20)).unwrap();

        assert!(controller.drag_start(&second.key()).is_err());

        controller.confirm_drop(true).unwrap();
        controller.drag_start(&second.key()).unwrap();
    }

    #[test]
    fn test_drag_start_requires_visible_block() {
        let mut controller = controller();
        let key = EventKey::parse("event-2025-03-17-09:00").unwrap();
        assert!(controller.drag_start(&key).is_err());
        assert!(controller.drag_state() == &DragState::Idle);
    }

    #[test]
    fn test_notifier_failure_does_not_undo_delete() {
        let mut controller = controller().with_notifier(FailingNotifier);
        let massage = event("Massage", 17, "09:00", "10:00");
        controller.add_event(&massage).unwrap();

        controller.drag_start(&massage.key()).unwrap();
        let outcome = controller
            .drag_end(Point::new(930, 20), &mut |_: &EventKey| true)
            .unwrap();

        assert_eq!(outcome, DragOutcome::Deleted(massage.key()));
        assert!(!controller.store().contains(&massage.key()).unwrap());
    }
}
