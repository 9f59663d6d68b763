//! 截屏 / 开发者工具检测
//!
//! 只是一个尽力而为的威慑手段，用来把用户引导到付费页，并不能真正阻止截屏。
//!
//! 分为两层：
//! - `CaptureDetector`: 纯状态机，把宿主事件映射为 `Reaction`
//! - `DetectionSession`: 把状态机接到具体宿主（DOM / 测试用假宿主）上，
//!   负责延时检查，并在 `detach` 之后忽略迟到的定时器

use crate::config::DetectionConfig;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

// =========================================================
// 事件与判定
// =========================================================

/// 一次按键（只关心 key 与修饰键）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyStroke {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyStroke {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Default::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    fn key_is(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }

    /// PrintScreen，macOS 的 Cmd+Shift+3/4/5，Windows 的 Win+Shift+S
    pub fn is_capture_shortcut(&self) -> bool {
        if self.key == "PrintScreen" {
            return true;
        }
        self.meta
            && self.shift
            && (matches!(self.key.as_str(), "3" | "4" | "5") || self.key_is("s"))
    }

    /// F12、Ctrl+Shift+I、Cmd+Alt+I、Ctrl+U
    pub fn is_devtools_shortcut(&self) -> bool {
        self.key == "F12"
            || (self.ctrl && self.shift && self.key_is("i"))
            || (self.meta && self.alt && self.key_is("i"))
            || (self.ctrl && self.key_is("u"))
    }
}

/// 宿主上报的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSignal {
    KeyDown(KeyStroke),
    ContextMenu,
    VisibilityChange { hidden: bool },
    WindowBlur,
}

/// 触发原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    CaptureShortcut,
    DevToolsShortcut,
    ContextMenu,
    /// 页面隐藏并持续隐藏超过宽限期
    HiddenPage,
    /// 窗口失焦后页面处于隐藏状态
    BlurWhileHidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    Visibility,
    Blur,
}

/// 需要延时后再次确认的检查
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredCheck {
    pub delay: Duration,
    pub kind: CheckKind,
    epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    Ignore,
    Fire { trigger: Trigger, prevent_default: bool },
    Defer(DeferredCheck),
}

// =========================================================
// 状态机
// =========================================================

/// 检测状态机
///
/// 唯一的状态是可见性纪元：每次可见性变化都会递增，
/// 因此"隐藏 -> 可见 -> 隐藏"期间发起的旧检查会失效，
/// 只有持续隐藏满宽限期才会触发。
#[derive(Debug, Clone)]
pub struct CaptureDetector {
    config: DetectionConfig,
    visibility_epoch: u64,
}

impl CaptureDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            config,
            visibility_epoch: 0,
        }
    }

    pub fn observe(&mut self, signal: &HostSignal) -> Reaction {
        match signal {
            HostSignal::KeyDown(stroke) if stroke.is_capture_shortcut() => Reaction::Fire {
                trigger: Trigger::CaptureShortcut,
                prevent_default: true,
            },
            HostSignal::KeyDown(stroke) if stroke.is_devtools_shortcut() => Reaction::Fire {
                trigger: Trigger::DevToolsShortcut,
                prevent_default: true,
            },
            HostSignal::KeyDown(_) => Reaction::Ignore,
            HostSignal::ContextMenu => Reaction::Fire {
                trigger: Trigger::ContextMenu,
                prevent_default: true,
            },
            HostSignal::VisibilityChange { hidden } => {
                self.visibility_epoch += 1;
                if *hidden {
                    Reaction::Defer(DeferredCheck {
                        delay: self.config.visibility_grace,
                        kind: CheckKind::Visibility,
                        epoch: self.visibility_epoch,
                    })
                } else {
                    Reaction::Ignore
                }
            }
            HostSignal::WindowBlur => Reaction::Defer(DeferredCheck {
                delay: self.config.blur_grace,
                kind: CheckKind::Blur,
                epoch: self.visibility_epoch,
            }),
        }
    }

    /// 延时到期后的确认
    pub fn settle(&self, check: &DeferredCheck, hidden_now: bool) -> Option<Trigger> {
        if !hidden_now {
            return None;
        }
        match check.kind {
            CheckKind::Visibility if check.epoch == self.visibility_epoch => {
                Some(Trigger::HiddenPage)
            }
            CheckKind::Visibility => None,
            CheckKind::Blur => Some(Trigger::BlurWhileHidden),
        }
    }
}

// =========================================================
// 宿主接入
// =========================================================

/// 宿主能力：查询页面是否隐藏、延时执行任务、上报检测结果
pub trait CaptureHost {
    fn is_hidden(&self) -> bool;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>);

    fn on_detected(&self, trigger: Trigger);
}

struct SessionInner<H> {
    detector: RefCell<CaptureDetector>,
    host: H,
    active: Cell<bool>,
}

impl<H: CaptureHost> SessionInner<H> {
    fn report(&self, trigger: Trigger) {
        if !self.active.get() {
            return;
        }
        log::warn!("[Detection] Screenshot or screen recording detected: {:?}", trigger);
        self.host.on_detected(trigger);
    }
}

/// 一次检测会话，随所属视图卸载而 `detach`
///
/// 定时任务只持有弱引用，会话被丢弃或 detach 后到期的检查直接忽略。
pub struct DetectionSession<H: CaptureHost + 'static> {
    inner: Rc<SessionInner<H>>,
}

impl<H: CaptureHost + 'static> DetectionSession<H> {
    pub fn new(config: DetectionConfig, host: H) -> Self {
        Self {
            inner: Rc::new(SessionInner {
                detector: RefCell::new(CaptureDetector::new(config)),
                host,
                active: Cell::new(true),
            }),
        }
    }

    pub fn host(&self) -> &H {
        &self.inner.host
    }

    pub fn is_active(&self) -> bool {
        self.inner.active.get()
    }

    /// 处理一个宿主事件，返回是否需要阻止默认行为
    pub fn handle(&self, signal: &HostSignal) -> bool {
        if !self.is_active() {
            return false;
        }
        let reaction = self.inner.detector.borrow_mut().observe(signal);
        match reaction {
            Reaction::Ignore => false,
            Reaction::Fire {
                trigger,
                prevent_default,
            } => {
                self.inner.report(trigger);
                prevent_default
            }
            Reaction::Defer(check) => {
                let weak: Weak<SessionInner<H>> = Rc::downgrade(&self.inner);
                self.inner.host.schedule(
                    check.delay,
                    Box::new(move || {
                        let Some(inner) = weak.upgrade() else {
                            return;
                        };
                        if !inner.active.get() {
                            return;
                        }
                        let hidden = inner.host.is_hidden();
                        let fired = inner.detector.borrow().settle(&check, hidden);
                        if let Some(trigger) = fired {
                            inner.report(trigger);
                        }
                    }),
                );
                false
            }
        }
    }

    pub fn detach(&self) {
        self.inner.active.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================
    // 虚拟时钟宿主
    // =========================================================

    struct Pending {
        due: Duration,
        task: Box<dyn FnOnce()>,
    }

    #[derive(Default)]
    struct FakeState {
        now: Duration,
        hidden: bool,
        queue: Vec<Pending>,
        detected: Vec<Trigger>,
    }

    #[derive(Clone, Default)]
    struct FakeHost {
        state: Rc<RefCell<FakeState>>,
    }

    impl FakeHost {
        fn set_hidden(&self, hidden: bool) {
            self.state.borrow_mut().hidden = hidden;
        }

        /// 推进虚拟时间，按到期顺序执行任务
        fn advance(&self, ms: u64) {
            let target = self.state.borrow().now + Duration::from_millis(ms);
            loop {
                let next = {
                    let mut state = self.state.borrow_mut();
                    let idx = state
                        .queue
                        .iter()
                        .enumerate()
                        .filter(|(_, p)| p.due <= target)
                        .min_by_key(|(_, p)| p.due)
                        .map(|(i, _)| i);
                    idx.map(|i| state.queue.remove(i))
                };
                let Some(pending) = next else { break };
                self.state.borrow_mut().now = pending.due;
                (pending.task)();
            }
            self.state.borrow_mut().now = target;
        }

        fn detected(&self) -> Vec<Trigger> {
            self.state.borrow().detected.clone()
        }
    }

    impl CaptureHost for FakeHost {
        fn is_hidden(&self) -> bool {
            self.state.borrow().hidden
        }

        fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
            let mut state = self.state.borrow_mut();
            let due = state.now + delay;
            state.queue.push(Pending { due, task });
        }

        fn on_detected(&self, trigger: Trigger) {
            self.state.borrow_mut().detected.push(trigger);
        }
    }

    fn session() -> (FakeHost, DetectionSession<FakeHost>) {
        let host = FakeHost::default();
        let session = DetectionSession::new(DetectionConfig::default(), host.clone());
        (host, session)
    }

    fn hide(host: &FakeHost, session: &DetectionSession<FakeHost>) {
        host.set_hidden(true);
        session.handle(&HostSignal::VisibilityChange { hidden: true });
    }

    fn show(host: &FakeHost, session: &DetectionSession<FakeHost>) {
        host.set_hidden(false);
        session.handle(&HostSignal::VisibilityChange { hidden: false });
    }

    // =========================================================
    // 按键规则
    // =========================================================

    #[test]
    fn capture_shortcuts() {
        assert!(KeyStroke::new("PrintScreen").is_capture_shortcut());
        assert!(KeyStroke::new("PrintScreen").alt().is_capture_shortcut());
        assert!(KeyStroke::new("4").meta().shift().is_capture_shortcut());
        assert!(KeyStroke::new("S").meta().shift().is_capture_shortcut());
        assert!(!KeyStroke::new("4").meta().is_capture_shortcut());
        assert!(!KeyStroke::new("s").ctrl().is_capture_shortcut());
    }

    #[test]
    fn devtools_shortcuts() {
        assert!(KeyStroke::new("F12").is_devtools_shortcut());
        assert!(KeyStroke::new("I").ctrl().shift().is_devtools_shortcut());
        assert!(KeyStroke::new("i").meta().alt().is_devtools_shortcut());
        assert!(KeyStroke::new("u").ctrl().is_devtools_shortcut());
        assert!(!KeyStroke::new("i").ctrl().is_devtools_shortcut());
        assert!(!KeyStroke::new("a").ctrl().is_devtools_shortcut());
    }

    #[test]
    fn ordinary_keys_are_ignored() {
        let mut detector = CaptureDetector::new(DetectionConfig::default());
        let reaction = detector.observe(&HostSignal::KeyDown(KeyStroke::new("c").ctrl()));
        assert_eq!(reaction, Reaction::Ignore);
    }

    #[test]
    fn key_triggers_prevent_default() {
        let (host, session) = session();
        assert!(session.handle(&HostSignal::KeyDown(KeyStroke::new("PrintScreen"))));
        assert!(session.handle(&HostSignal::KeyDown(KeyStroke::new("F12"))));
        assert!(session.handle(&HostSignal::ContextMenu));
        assert_eq!(
            host.detected(),
            [
                Trigger::CaptureShortcut,
                Trigger::DevToolsShortcut,
                Trigger::ContextMenu
            ]
        );
    }

    // =========================================================
    // 可见性 / 失焦
    // =========================================================

    #[test]
    fn hidden_past_grace_fires() {
        let (host, session) = session();
        hide(&host, &session);
        host.advance(799);
        assert!(host.detected().is_empty());
        host.advance(1);
        assert_eq!(host.detected(), [Trigger::HiddenPage]);
    }

    #[test]
    fn visible_again_before_grace_does_not_fire() {
        let (host, session) = session();
        hide(&host, &session);
        host.advance(500);
        show(&host, &session);
        host.advance(1000);
        assert!(host.detected().is_empty());
    }

    #[test]
    fn hide_show_hide_needs_continuous_grace() {
        let (host, session) = session();
        hide(&host, &session);
        host.advance(500);
        show(&host, &session);
        host.advance(100);
        hide(&host, &session);
        // 第一次隐藏的检查在 800ms 到期，此时页面虽隐藏但已不是同一次隐藏
        host.advance(300);
        assert!(host.detected().is_empty());
        host.advance(500);
        assert_eq!(host.detected(), [Trigger::HiddenPage]);
    }

    #[test]
    fn blur_then_hidden_fires() {
        let (host, session) = session();
        session.handle(&HostSignal::WindowBlur);
        host.set_hidden(true);
        host.advance(1000);
        assert_eq!(host.detected(), [Trigger::BlurWhileHidden]);
    }

    #[test]
    fn blur_while_visible_does_not_fire() {
        let (host, session) = session();
        session.handle(&HostSignal::WindowBlur);
        host.advance(2000);
        assert!(host.detected().is_empty());
    }

    #[test]
    fn detach_ignores_late_timers() {
        let (host, session) = session();
        hide(&host, &session);
        session.detach();
        host.advance(1000);
        assert!(host.detected().is_empty());
        assert!(!session.handle(&HostSignal::ContextMenu));
    }

    #[test]
    fn dropped_session_ignores_late_timers() {
        let (host, session) = session();
        hide(&host, &session);
        drop(session);
        host.advance(1000);
        assert!(host.detected().is_empty());
    }

    #[test]
    fn grace_follows_config() {
        let config = DetectionConfig {
            visibility_grace: Duration::from_millis(50),
            blur_grace: Duration::from_millis(50),
        };
        let host = FakeHost::default();
        let session = DetectionSession::new(config, host.clone());
        hide(&host, &session);
        host.advance(50);
        assert_eq!(host.detected(), [Trigger::HiddenPage]);
    }
}
