//! Tooltip lifecycle.
//!
//! A widget owns one [`TooltipLifecycleManager`], which lazily creates a
//! tooltip instance the first time each target is hovered and keeps every
//! instance attached to a single shared controller (the "singleton") so that
//! only one tooltip is shown at a time.  The actual tooltips are produced by a
//! [`TooltipEngine`].
mod content;
mod terminal;
pub use self::content::{TooltipContent, TooltipSubject};
pub use self::terminal::{SingletonId, TerminalTooltips, TooltipId, TooltipPopup};
use crate::options::TooltipProps;
use serde_json::Value;
use std::fmt;
use std::ops::{Deref, DerefMut};
use tracing::{debug, trace};

/// Back end that creates and destroys tooltips
pub trait TooltipEngine {
    /// What a tooltip is attached to (e.g., a cell index)
    type Target: PartialEq + fmt::Debug;
    type Instance: Clone + fmt::Debug;
    type Singleton: fmt::Debug;

    fn create_instance(
        &mut self,
        target: &Self::Target,
        content: &str,
        props: &TooltipProps,
    ) -> Self::Instance;

    fn set_content(&mut self, instance: &Self::Instance, content: &str);

    fn create_singleton(
        &mut self,
        instances: &[Self::Instance],
        props: &TooltipProps,
    ) -> Self::Singleton;

    /// Replaces the set of instances managed by the singleton
    fn set_instances(&mut self, singleton: &mut Self::Singleton, instances: &[Self::Instance]);

    /// Hides whatever tooltip the singleton is currently showing
    fn hide(&mut self, _singleton: &mut Self::Singleton) {}

    fn destroy_instance(&mut self, instance: Self::Instance);

    fn destroy_singleton(&mut self, singleton: Self::Singleton);
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    Initialized,
    Disposed,
}

/// Properties every singleton is created with; caller props override them
pub fn base_props() -> TooltipProps {
    TooltipProps::from([
        (
            String::from("moveTransition"),
            Value::from("transform 0.1s ease-out"),
        ),
        (String::from("allowHTML"), Value::from(true)),
    ])
}

pub struct TooltipLifecycleManager<E: TooltipEngine> {
    engine: E,
    content: TooltipContent,
    props: TooltipProps,
    singleton: Option<E::Singleton>,
    instances: Vec<(E::Target, E::Instance)>,
    state: LifecycleState,
}

impl<E: TooltipEngine> TooltipLifecycleManager<E> {
    /// `props` are the caller's engine properties, handed to the singleton and
    /// to every instance.
    pub fn new(engine: E, content: TooltipContent, props: TooltipProps) -> Self {
        TooltipLifecycleManager {
            engine,
            content,
            props,
            singleton: None,
            instances: Vec::new(),
            state: LifecycleState::Uninitialized,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn content(&self) -> &TooltipContent {
        &self.content
    }

    /// Replaces the settings used for tooltip text.  Existing instances keep
    /// their text until next hovered.
    pub fn set_content(&mut self, content: TooltipContent) {
        self.content = content;
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Number of live tooltip instances
    pub fn pool_size(&self) -> usize {
        self.instances.len()
    }

    pub fn has_singleton(&self) -> bool {
        self.singleton.is_some()
    }

    /// Empties the instance pool and makes sure the singleton exists
    pub fn init(&mut self) {
        if self.state == LifecycleState::Disposed {
            debug!("ignoring init() on disposed tooltip manager");
            return;
        }
        self.clear_pool();
        if let Some(singleton) = self.singleton.as_mut() {
            self.engine.set_instances(singleton, &[]);
        } else {
            let mut props = base_props();
            props.extend(self.props.clone());
            self.singleton = Some(self.engine.create_singleton(&[], &props));
        }
        self.state = LifecycleState::Initialized;
        trace!("tooltip manager initialized");
    }

    /// Shows the tooltip for `subject` on `target`, creating an instance for
    /// the target if it has none yet.  Does nothing if the subject has no
    /// tooltip text.
    pub fn on_hover<S: TooltipSubject + ?Sized>(&mut self, target: E::Target, subject: &S) {
        if self.state != LifecycleState::Initialized {
            debug!(?target, state = ?self.state, "ignoring hover on inactive tooltip manager");
            return;
        }
        let Some(text) = subject.tooltip_text(&self.content) else {
            trace!(?target, "no tooltip content for target");
            return;
        };
        if let Some((_, instance)) = self.instances.iter().find(|(t, _)| *t == target) {
            self.engine.set_content(instance, &text);
        } else {
            let instance = self.engine.create_instance(&target, &text, &self.props);
            trace!(?target, ?instance, "created tooltip instance");
            self.instances.push((target, instance));
            self.refresh_singleton();
        }
    }

    /// Hides the currently shown tooltip, if any
    pub fn on_leave(&mut self) {
        if self.state != LifecycleState::Initialized {
            return;
        }
        if let Some(singleton) = self.singleton.as_mut() {
            self.engine.hide(singleton);
        }
    }

    /// Drops every instance while keeping the singleton alive, e.g. when the
    /// rendered cells are regenerated
    pub fn reset(&mut self) {
        if self.state == LifecycleState::Disposed {
            debug!("ignoring reset() on disposed tooltip manager");
            return;
        }
        self.clear_pool();
        if let Some(singleton) = self.singleton.as_mut() {
            self.engine.set_instances(singleton, &[]);
        }
    }

    /// Tears down the singleton and every instance.  The manager is unusable
    /// afterwards; calling this again is a no-op.
    pub fn destroy(&mut self) {
        if self.state == LifecycleState::Disposed {
            return;
        }
        if let Some(singleton) = self.singleton.take() {
            self.engine.destroy_singleton(singleton);
        }
        self.clear_pool();
        self.state = LifecycleState::Disposed;
        debug!("tooltip manager disposed");
    }

    fn clear_pool(&mut self) {
        for (_, instance) in self.instances.drain(..) {
            self.engine.destroy_instance(instance);
        }
    }

    fn refresh_singleton(&mut self) {
        if let Some(singleton) = self.singleton.as_mut() {
            let instances = self
                .instances
                .iter()
                .map(|(_, i)| i.clone())
                .collect::<Vec<_>>();
            self.engine.set_instances(singleton, &instances);
        }
    }
}

impl<E> fmt::Debug for TooltipLifecycleManager<E>
where
    E: TooltipEngine + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TooltipLifecycleManager")
            .field("engine", &self.engine)
            .field("content", &self.content)
            .field("props", &self.props)
            .field("singleton", &self.singleton)
            .field("instances", &self.instances)
            .field("state", &self.state)
            .finish()
    }
}

/// An initialized [`TooltipLifecycleManager`] that is destroyed when dropped
#[derive(Debug)]
pub struct TooltipGuard<E: TooltipEngine>(TooltipLifecycleManager<E>);

impl<E: TooltipEngine> TooltipGuard<E> {
    pub fn new(mut manager: TooltipLifecycleManager<E>) -> Self {
        manager.init();
        TooltipGuard(manager)
    }
}

impl<E: TooltipEngine> Deref for TooltipGuard<E> {
    type Target = TooltipLifecycleManager<E>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<E: TooltipEngine> DerefMut for TooltipGuard<E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<E: TooltipEngine> Drop for TooltipGuard<E> {
    fn drop(&mut self) {
        self.0.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeatmapColor, HeatmapDay};
    use crate::options::CalendarOptions;
    use std::cell::RefCell;
    use std::rc::Rc;
    use time::macros::date;

    #[derive(Clone, Debug, PartialEq)]
    enum Call {
        CreateInstance(u32, String, usize),
        SetContent(usize, String),
        CreateSingleton(Vec<usize>, TooltipProps),
        SetInstances(Vec<usize>),
        Hide,
        DestroyInstance(usize),
        DestroySingleton,
    }

    #[derive(Clone, Debug, Default)]
    struct Recorder {
        calls: Rc<RefCell<Vec<Call>>>,
        next_id: usize,
    }

    impl Recorder {
        fn take(&self) -> Vec<Call> {
            std::mem::take(&mut *self.calls.borrow_mut())
        }
    }

    impl TooltipEngine for Recorder {
        type Target = u32;
        type Instance = usize;
        type Singleton = ();

        fn create_instance(&mut self, target: &u32, content: &str, props: &TooltipProps) -> usize {
            let id = self.next_id;
            self.next_id += 1;
            self.calls
                .borrow_mut()
                .push(Call::CreateInstance(*target, content.to_owned(), props.len()));
            id
        }

        fn set_content(&mut self, instance: &usize, content: &str) {
            self.calls
                .borrow_mut()
                .push(Call::SetContent(*instance, content.to_owned()));
        }

        fn create_singleton(&mut self, instances: &[usize], props: &TooltipProps) {
            self.calls
                .borrow_mut()
                .push(Call::CreateSingleton(instances.to_vec(), props.clone()));
        }

        fn set_instances(&mut self, _singleton: &mut (), instances: &[usize]) {
            self.calls
                .borrow_mut()
                .push(Call::SetInstances(instances.to_vec()));
        }

        fn hide(&mut self, _singleton: &mut ()) {
            self.calls.borrow_mut().push(Call::Hide);
        }

        fn destroy_instance(&mut self, instance: usize) {
            self.calls.borrow_mut().push(Call::DestroyInstance(instance));
        }

        fn destroy_singleton(&mut self, _singleton: ()) {
            self.calls.borrow_mut().push(Call::DestroySingleton);
        }
    }

    fn content() -> TooltipContent {
        let opts = CalendarOptions::new(date!(2025 - 01 - 01));
        let months = crate::locale::LocalizationProvider::builtin(2025)
            .month_names("en")
            .to_vec();
        TooltipContent::new(&opts, months)
    }

    fn manager(props: TooltipProps) -> (TooltipLifecycleManager<Recorder>, Recorder) {
        let recorder = Recorder::default();
        let mgr = TooltipLifecycleManager::new(recorder.clone(), content(), props);
        (mgr, recorder)
    }

    #[test]
    fn test_init_creates_singleton_with_merged_props() {
        let props = TooltipProps::from([
            (String::from("placement"), Value::from("bottom")),
            (String::from("allowHTML"), Value::from(false)),
        ]);
        let (mut mgr, rec) = manager(props);
        assert_eq!(mgr.state(), LifecycleState::Uninitialized);
        mgr.init();
        assert_eq!(mgr.state(), LifecycleState::Initialized);
        let expected = TooltipProps::from([
            (
                String::from("moveTransition"),
                Value::from("transform 0.1s ease-out"),
            ),
            (String::from("allowHTML"), Value::from(false)),
            (String::from("placement"), Value::from("bottom")),
        ]);
        assert_eq!(rec.take(), [Call::CreateSingleton(Vec::new(), expected)]);
    }

    #[test]
    fn test_second_init_refreshes_singleton() {
        let (mut mgr, rec) = manager(TooltipProps::new());
        mgr.init();
        mgr.on_hover(3, &HeatmapDay::new(date!(2025 - 01 - 06), 2.0));
        rec.take();
        mgr.init();
        assert_eq!(
            rec.take(),
            [Call::DestroyInstance(0), Call::SetInstances(Vec::new())]
        );
        assert_eq!(mgr.pool_size(), 0);
    }

    #[test]
    fn test_hover_before_init_is_ignored() {
        let (mut mgr, rec) = manager(TooltipProps::new());
        mgr.on_hover(0, &HeatmapDay::new(date!(2025 - 01 - 06), 2.0));
        assert_eq!(rec.take(), []);
        assert_eq!(mgr.pool_size(), 0);
    }

    #[test]
    fn test_hover_creates_then_updates() {
        let (mut mgr, rec) = manager(TooltipProps::new());
        mgr.init();
        rec.take();
        let day = HeatmapDay::new(date!(2025 - 01 - 06), 2.0);
        mgr.on_hover(7, &day);
        assert_eq!(
            rec.take(),
            [
                Call::CreateInstance(7, String::from("2 contribution on January 6"), 0),
                Call::SetInstances(vec![0]),
            ]
        );
        mgr.on_hover(7, &HeatmapDay::new(date!(2025 - 01 - 06), 5.0));
        assert_eq!(
            rec.take(),
            [Call::SetContent(0, String::from("5 contribution on January 6"))]
        );
        mgr.on_hover(8, &HeatmapColor::range(1.0, 10.0, "green"));
        assert_eq!(
            rec.take(),
            [
                Call::CreateInstance(8, String::from("min: 1 - max: 10"), 0),
                Call::SetInstances(vec![0, 1]),
            ]
        );
        assert_eq!(mgr.pool_size(), 2);
    }

    #[test]
    fn test_hover_without_content() {
        let (mut mgr, rec) = manager(TooltipProps::new());
        let mut opts = CalendarOptions::new(date!(2025 - 01 - 01));
        opts.i18n.no_data = String::new();
        mgr.set_content(TooltipContent::new(&opts, Vec::new()));
        mgr.init();
        rec.take();
        mgr.on_hover(1, &HeatmapDay::empty(date!(2025 - 01 - 06)));
        assert_eq!(rec.take(), []);
        assert_eq!(mgr.pool_size(), 0);
    }

    #[test]
    fn test_reset_keeps_singleton() {
        let (mut mgr, rec) = manager(TooltipProps::new());
        mgr.init();
        mgr.on_hover(1, &HeatmapDay::new(date!(2025 - 01 - 06), 2.0));
        mgr.on_hover(2, &HeatmapDay::new(date!(2025 - 01 - 07), 2.0));
        rec.take();
        mgr.reset();
        assert_eq!(
            rec.take(),
            [
                Call::DestroyInstance(0),
                Call::DestroyInstance(1),
                Call::SetInstances(Vec::new()),
            ]
        );
        assert!(mgr.has_singleton(), "reset should not destroy the singleton");
        assert_eq!(mgr.state(), LifecycleState::Initialized);
    }

    #[test]
    fn test_on_leave_hides() {
        let (mut mgr, rec) = manager(TooltipProps::new());
        mgr.on_leave();
        assert_eq!(rec.take(), []);
        mgr.init();
        rec.take();
        mgr.on_leave();
        assert_eq!(rec.take(), [Call::Hide]);
    }

    #[test]
    fn test_destroy() {
        let (mut mgr, rec) = manager(TooltipProps::new());
        mgr.init();
        mgr.on_hover(1, &HeatmapDay::new(date!(2025 - 01 - 06), 2.0));
        rec.take();
        mgr.destroy();
        assert_eq!(
            rec.take(),
            [Call::DestroySingleton, Call::DestroyInstance(0)]
        );
        assert_eq!(mgr.state(), LifecycleState::Disposed);
        assert!(!mgr.has_singleton(), "singleton should be gone");
        mgr.destroy();
        mgr.init();
        mgr.reset();
        mgr.on_hover(2, &HeatmapDay::new(date!(2025 - 01 - 07), 2.0));
        assert_eq!(rec.take(), []);
        assert_eq!(mgr.state(), LifecycleState::Disposed);
    }

    #[test]
    fn test_guard_destroys_on_drop() {
        let (mgr, rec) = manager(TooltipProps::new());
        {
            let mut guard = TooltipGuard::new(mgr);
            assert_eq!(guard.state(), LifecycleState::Initialized);
            guard.on_hover(4, &HeatmapDay::new(date!(2025 - 01 - 06), 2.0));
            rec.take();
        }
        assert_eq!(
            rec.take(),
            [Call::DestroySingleton, Call::DestroyInstance(0)]
        );
    }
}
