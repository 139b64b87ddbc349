//! # Web 绑定
//!
//! 浏览器入口：导出给页面脚本调用的 `start` / `animateCount` / `updateStat` 等，
//! 并用 `requestAnimationFrame` 驱动帧循环。没有待处理工作时帧循环自动停止，
//! 下一次调用导出函数时重新启动。

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use stat_runtime::Clock;
use tracing::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{DocumentReadyState, Element};

use crate::clock::PerformanceClock;
use crate::config::AppConfig;
use crate::dashboard::Dashboard;
use crate::dom::WebDom;

thread_local! {
    static DASHBOARD: RefCell<Option<Dashboard<WebDom>>> = const { RefCell::new(None) };
    static FRAME_CALLBACK: RefCell<Option<Closure<dyn FnMut()>>> = const { RefCell::new(None) };
    static FRAME_SCHEDULED: Cell<bool> = const { Cell::new(false) };
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

fn create_dashboard(config: AppConfig) -> Result<Dashboard<WebDom>, JsValue> {
    let dom = WebDom::from_window().map_err(js_error)?;
    let clock: Rc<dyn Clock> = Rc::new(
        PerformanceClock::from_window()
            .ok_or_else(|| js_error("window.performance 不可用"))?,
    );
    Ok(Dashboard::new(config, dom, clock))
}

/// 在仪表盘上执行操作，尚未创建时使用默认配置创建
fn with_dashboard<T>(
    f: impl FnOnce(&mut Dashboard<WebDom>) -> Result<T, JsValue>,
) -> Result<T, JsValue> {
    let result = DASHBOARD.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(create_dashboard(AppConfig::default())?);
        }
        match slot.as_mut() {
            Some(dashboard) => f(dashboard),
            None => Err(js_error("仪表盘未初始化")),
        }
    });
    ensure_frame_loop();
    result
}

fn on_frame() {
    FRAME_SCHEDULED.with(|scheduled| scheduled.set(false));

    let pending = DASHBOARD.with(|cell| {
        cell.borrow_mut()
            .as_mut()
            .is_some_and(|dashboard| dashboard.frame())
    });
    if pending {
        ensure_frame_loop();
    }
}

/// 如果有待处理工作且尚未安排下一帧，则请求一帧
fn ensure_frame_loop() {
    let pending = DASHBOARD.with(|cell| {
        cell.borrow()
            .as_ref()
            .is_some_and(|dashboard| dashboard.has_pending_work())
    });
    if !pending || FRAME_SCHEDULED.with(Cell::get) {
        return;
    }

    let Some(window) = web_sys::window() else {
        warn!("window 不可用，无法启动帧循环");
        return;
    };

    FRAME_CALLBACK.with(|cell| {
        let mut slot = cell.borrow_mut();
        let callback = slot.get_or_insert_with(|| Closure::new(on_frame));
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(_) => FRAME_SCHEDULED.with(|scheduled| scheduled.set(true)),
            Err(e) => warn!(error = ?e, "requestAnimationFrame 失败"),
        }
    });
}

fn ready() {
    let result = with_dashboard(|dashboard| Ok(dashboard.on_ready()));
    match result {
        Ok(count) => info!(count, "仪表盘就绪"),
        Err(e) => warn!(error = ?e, "仪表盘初始化失败"),
    }
}

/// 启动仪表盘
///
/// `config_json` 为可选的 JSON 配置。文档仍在解析时等待 `DOMContentLoaded`，
/// 否则立即初始化。
#[wasm_bindgen]
pub fn start(config_json: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let config = match config_json {
        Some(json) => AppConfig::from_json_str(&json).map_err(js_error)?,
        None => AppConfig::default(),
    };
    config.validate().map_err(js_error)?;

    let dashboard = create_dashboard(config)?;
    let document = dashboard.dom().document().clone();
    DASHBOARD.with(|cell| *cell.borrow_mut() = Some(dashboard));

    if document.ready_state() == DocumentReadyState::Loading {
        let listener = Closure::<dyn FnMut()>::new(ready);
        document.add_event_listener_with_callback(
            "DOMContentLoaded",
            listener.as_ref().unchecked_ref(),
        )?;
        listener.forget();
    } else {
        ready();
    }
    Ok(())
}

/// 在元素上播放从 `start` 到 `end` 的计数动画
#[wasm_bindgen(js_name = animateCount)]
pub fn animate_count(
    element: Element,
    start: f64,
    end: f64,
    duration: Option<f64>,
) -> Result<(), JsValue> {
    with_dashboard(|dashboard| {
        dashboard
            .animate_count(&element, start, end, duration)
            .map(|_| ())
            .map_err(js_error)
    })
}

/// 更新元素的数值：计数动画 + 脉冲 + 卡片高亮
#[wasm_bindgen(js_name = updateStat)]
pub fn update_stat(element: Element, new_value: f64) -> Result<(), JsValue> {
    with_dashboard(|dashboard| dashboard.update_stat(&element, new_value).map_err(js_error))
}

/// 跳过所有计数动画
#[wasm_bindgen(js_name = skipAll)]
pub fn skip_all() -> Result<(), JsValue> {
    with_dashboard(|dashboard| {
        dashboard.skip_all();
        Ok(())
    })
}

/// 重新扫描文档：接入新插入的统计元素，释放已移除的元素
///
/// 返回新初始化的统计项数量。
#[wasm_bindgen]
pub fn rescan() -> Result<usize, JsValue> {
    with_dashboard(|dashboard| Ok(dashboard.on_ready()))
}

/// 解除元素绑定，丢弃其动画与等待中的高亮清除
#[wasm_bindgen(js_name = unbindStat)]
pub fn unbind_stat(element: Element) -> Result<bool, JsValue> {
    with_dashboard(|dashboard| Ok(dashboard.unbind(&element)))
}
