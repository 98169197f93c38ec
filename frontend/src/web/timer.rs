//! 定时器封装模块
//!
//! 使用 `web_sys` 的原生 `setTimeout`，用于提示框自动关闭和延迟跳转。

use wasm_bindgen::prelude::*;

/// 一次性定时器
///
/// 当 `Timeout` 被 drop 时，若尚未触发则自动取消。
/// 用新的定时器替换旧的即可实现"重新计时"。
pub struct Timeout {
    handle: Option<i32>,
    #[allow(dead_code)]
    closure: Closure<dyn FnMut()>,
}

impl Timeout {
    /// 创建新的一次性定时器
    ///
    /// 无法获取 window 或注册失败时回调不会执行，定时器处于空转状态。
    pub fn new<F>(duration: std::time::Duration, callback: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        let mut callback = Some(callback);
        let closure = Closure::<dyn FnMut()>::new(move || {
            if let Some(cb) = callback.take() {
                cb();
            }
        });

        let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
        let handle = web_sys::window().and_then(|window| {
            window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    millis,
                )
                .ok()
        });

        Self { handle, closure }
    }

    /// 取消定时器
    pub fn cancel(&mut self) {
        if let (Some(handle), Some(window)) = (self.handle.take(), web_sys::window()) {
            window.clear_timeout_with_handle(handle);
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}
