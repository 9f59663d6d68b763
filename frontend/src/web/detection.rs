//! 截屏检测的 DOM 接入
//!
//! 把 document / window 上的事件转换为 `HostSignal` 交给 `DetectionSession`。
//! `CaptureGuard` 被 drop 时移除全部监听器并 detach 会话。

use gloo_timers::callback::Timeout;
use std::rc::Rc;
use std::time::Duration;
use templateshare::DetectionConfig;
use templateshare::detection::{CaptureHost, DetectionSession, HostSignal, KeyStroke, Trigger};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, KeyboardEvent};

/// 浏览器宿主
pub struct WebCaptureHost {
    on_detected: Rc<dyn Fn(Trigger)>,
}

impl CaptureHost for WebCaptureHost {
    fn is_hidden(&self) -> bool {
        web_sys::window()
            .and_then(|w| w.document())
            .map(|d| d.hidden())
            .unwrap_or(false)
    }

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        // 会话 detach 后任务自行失效，不需要保留句柄
        Timeout::new(millis, task).forget();
    }

    fn on_detected(&self, trigger: Trigger) {
        (self.on_detected)(trigger);
    }
}

type Listener = Closure<dyn FnMut(Event)>;

/// 监听器的 RAII 句柄
pub struct CaptureGuard {
    session: Rc<DetectionSession<WebCaptureHost>>,
    listeners: Vec<(EventTarget, &'static str, Listener)>,
}

impl CaptureGuard {
    fn listen(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) {
        let closure = Listener::new(handler);
        match target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
            Ok(()) => self.listeners.push((target.clone(), event, closure)),
            Err(e) => log::error!("[Detection] Failed to listen for {}: {:?}", event, e),
        }
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        self.session.detach();
        for (target, event, closure) in self.listeners.drain(..) {
            let _ = target
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
    }
}

fn stroke(ev: &KeyboardEvent) -> KeyStroke {
    KeyStroke {
        key: ev.key(),
        ctrl: ev.ctrl_key(),
        shift: ev.shift_key(),
        alt: ev.alt_key(),
        meta: ev.meta_key(),
    }
}

/// 在 document / window 上安装检测监听器
///
/// 拿不到 window 或 document 时返回 `None`（不影响页面渲染）。
pub fn install<F>(config: DetectionConfig, on_detected: F) -> Option<CaptureGuard>
where
    F: Fn(Trigger) + 'static,
{
    let window = web_sys::window()?;
    let document = window.document()?;

    let session = Rc::new(DetectionSession::new(
        config,
        WebCaptureHost {
            on_detected: Rc::new(on_detected),
        },
    ));
    let mut guard = CaptureGuard {
        session: session.clone(),
        listeners: Vec::new(),
    };

    let s = session.clone();
    guard.listen(&document, "keydown", move |ev| {
        if let Some(kev) = ev.dyn_ref::<KeyboardEvent>() {
            if s.handle(&HostSignal::KeyDown(stroke(kev))) {
                ev.prevent_default();
            }
        }
    });

    let s = session.clone();
    guard.listen(&document, "contextmenu", move |ev| {
        if s.handle(&HostSignal::ContextMenu) {
            ev.prevent_default();
        }
    });

    let s = session.clone();
    let doc = document.clone();
    guard.listen(&document, "visibilitychange", move |_| {
        s.handle(&HostSignal::VisibilityChange {
            hidden: doc.hidden(),
        });
    });

    let s = session;
    guard.listen(&window, "blur", move |_| {
        s.handle(&HostSignal::WindowBlur);
    });

    log::debug!("[Detection] Listeners installed.");
    Some(guard)
}
