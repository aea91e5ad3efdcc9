//! Injected browser wallet (`window.ethereum`) as an [`Eip1193`] provider.

use js_sys::{Function, Object, Promise, Reflect, JSON};
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::error::ProviderError;
use crate::wallet::Eip1193;

/// Handle to the provider a browser extension injects into the page.
pub struct InjectedProvider {
    ethereum: Object,
}

impl InjectedProvider {
    /// `window.ethereum`, if a wallet extension is installed.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return None;
        }
        Some(Self {
            ethereum: ethereum.unchecked_into(),
        })
    }
}

fn js_error(err: &JsValue) -> ProviderError {
    let code = Reflect::get(err, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_f64())
        .map(|c| c as i64)
        .unwrap_or(ProviderError::INTERNAL);
    let message = Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", err));
    ProviderError::new(code, message)
}

fn to_js(value: &Value) -> Result<JsValue, ProviderError> {
    let text = serde_json::to_string(value)
        .map_err(|e| ProviderError::new(ProviderError::INTERNAL, e.to_string()))?;
    JSON::parse(&text).map_err(|e| js_error(&e))
}

fn from_js(value: &JsValue) -> Result<Value, ProviderError> {
    if value.is_undefined() || value.is_null() {
        return Ok(Value::Null);
    }
    let text: String = JSON::stringify(value).map_err(|e| js_error(&e))?.into();
    serde_json::from_str(&text)
        .map_err(|e| ProviderError::new(ProviderError::INTERNAL, e.to_string()))
}

#[async_trait::async_trait(?Send)]
impl Eip1193 for InjectedProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let args = Object::new();
        Reflect::set(&args, &JsValue::from_str("method"), &JsValue::from_str(method))
            .map_err(|e| js_error(&e))?;
        Reflect::set(&args, &JsValue::from_str("params"), &to_js(&params)?)
            .map_err(|e| js_error(&e))?;

        let request: Function = Reflect::get(&self.ethereum, &JsValue::from_str("request"))
            .map_err(|e| js_error(&e))?
            .dyn_into()
            .map_err(|_| {
                ProviderError::new(
                    ProviderError::INTERNAL,
                    "window.ethereum.request is not a function",
                )
            })?;

        let promise: Promise = request
            .call1(&self.ethereum, &args)
            .map_err(|e| js_error(&e))?
            .dyn_into()
            .map_err(|_| {
                ProviderError::new(ProviderError::INTERNAL, "request did not return a promise")
            })?;

        let result = JsFuture::from(promise).await.map_err(|e| js_error(&e))?;
        from_js(&result)
    }
}
