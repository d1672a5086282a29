use std::{
    borrow::Cow,
    collections::{HashMap, HashSet},
    convert::{TryFrom, TryInto},
};

pub struct InputParams {
    params: HashMap<String, InputParamsValue>,
    name: Cow<'static, str>,
    visited_names: HashSet<String>,
}

pub enum InputParamsValue {
    Int(i32),
    Float(f32),
    Bool(bool),
    String(String),
    Array(Vec<InputParamsValue>),
}

impl InputParamsValue {
    fn as_float(&self) -> Option<f32> {
        match self {
            InputParamsValue::Float(value) => Some(*value),
            InputParamsValue::Int(value) => Some(*value as f32),
            _ => None,
        }
    }
}

macro_rules! params_get {
    ( $( ( $name:ident, $type:ty, $variant:ident, $hint:expr ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[allow(dead_code)]
                pub fn [<get_ $name>](&mut self, key: &str) -> anyhow::Result<$type> {
                    if let Some(value) = self.params.get(key) {
                        if let InputParamsValue::$variant(value) = value {
                            self.visited_names.insert(key.to_owned());
                            return Ok(*value);
                        }
                        anyhow::bail!(format!("{} - '{}' should be {}", self.name, key, $hint));
                    }
                    anyhow::bail!(format!("{} - there is no '{}' field", self.name, key));
                }

                #[allow(dead_code)]
                pub fn [<get_ $name _or>](&mut self, key: &str, fallback: $type) -> anyhow::Result<$type> {
                    if self.params.contains_key(key) {
                        self.[<get_ $name>](key)
                    } else {
                        Ok(fallback)
                    }
                }
            }
        )+
    };
}

impl InputParams {
    pub fn set_name(&mut self, name: Cow<'static, str>) {
        self.name = name;
    }

    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    params_get! {
        (int, i32, Int, "integer"),
        (bool, bool, Bool, "boolean"),
    }

    pub fn get_float(&mut self, key: &str) -> anyhow::Result<f32> {
        if let Some(value) = self.params.get(key) {
            if let Some(value) = value.as_float() {
                self.visited_names.insert(key.to_owned());
                return Ok(value);
            }
            anyhow::bail!(format!("{} - '{}' should be float", self.name, key));
        }
        anyhow::bail!(format!("{} - there is no '{}' field", self.name, key));
    }

    pub fn get_float_or(&mut self, key: &str, fallback: f32) -> anyhow::Result<f32> {
        if self.params.contains_key(key) {
            self.get_float(key)
        } else {
            Ok(fallback)
        }
    }

    pub fn get_float3(&mut self, key: &str) -> anyhow::Result<[f32; 3]> {
        let arr = self.get_float_array(key, Some(3))?;
        Ok([arr[0], arr[1], arr[2]])
    }

    pub fn get_float3_or(&mut self, key: &str, fallback: [f32; 3]) -> anyhow::Result<[f32; 3]> {
        if self.params.contains_key(key) {
            self.get_float3(key)
        } else {
            Ok(fallback)
        }
    }

    pub fn get_float_array(&mut self, key: &str, len: Option<usize>) -> anyhow::Result<Vec<f32>> {
        if let Some(value) = self.params.get(key) {
            let error_info = if let Some(len) = len {
                format!("{} - '{}' should be array with {} floats", self.name, key, len)
            } else {
                format!("{} - '{}' should be array of float", self.name, key)
            };
            if let InputParamsValue::Array(arr) = value {
                if len.map_or(false, |len| arr.len() != len) {
                    anyhow::bail!(error_info);
                }
                let mut result = Vec::with_capacity(arr.len());
                for ele in arr {
                    match ele.as_float() {
                        Some(ele) => result.push(ele),
                        None => anyhow::bail!(error_info),
                    }
                }
                self.visited_names.insert(key.to_owned());
                return Ok(result);
            }
            anyhow::bail!(error_info);
        }
        anyhow::bail!(format!("{} - there is no '{}' field", self.name, key));
    }

    /// Integers of an array; its length is checked by the caller.
    pub fn get_int_array(&mut self, key: &str) -> anyhow::Result<Vec<i32>> {
        if let Some(value) = self.params.get(key) {
            let error_info = format!("{} - '{}' should be array of integer", self.name, key);
            if let InputParamsValue::Array(arr) = value {
                let mut result = Vec::with_capacity(arr.len());
                for ele in arr {
                    if let InputParamsValue::Int(ele) = ele {
                        result.push(*ele);
                    } else {
                        anyhow::bail!(error_info);
                    }
                }
                self.visited_names.insert(key.to_owned());
                return Ok(result);
            }
            anyhow::bail!(error_info);
        }
        anyhow::bail!(format!("{} - there is no '{}' field", self.name, key));
    }

    pub fn get_str(&mut self, key: &str) -> anyhow::Result<String> {
        if let Some(value) = self.params.get(key) {
            if let InputParamsValue::String(value) = value {
                self.visited_names.insert(key.to_owned());
                return Ok(value.clone());
            }
            anyhow::bail!(format!("{} - '{}' should be string", self.name, key));
        }
        anyhow::bail!(format!("{} - there is no '{}' field", self.name, key));
    }

    pub fn check_unused_keys(&self) {
        for k in self.params.keys() {
            if !k.starts_with('#') && !self.visited_names.contains(k) {
                log::warn!("{} - unused key '{}'", self.name, k);
            }
        }
    }
}

impl TryFrom<&serde_json::Value> for InputParamsValue {
    type Error = anyhow::Error;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Null => {
                anyhow::bail!("can't convert to InputParamsValue from null json")
            }
            serde_json::Value::Bool(v) => Ok(Self::Bool(*v)),
            serde_json::Value::Number(v) => {
                if let Some(v) = v.as_i64() {
                    Ok(Self::Int(v as i32))
                } else if let Some(v) = v.as_f64() {
                    Ok(Self::Float(v as f32))
                } else {
                    anyhow::bail!("can't convert number '{}'", v)
                }
            }
            serde_json::Value::String(v) => Ok(Self::String(v.clone())),
            serde_json::Value::Array(arr) => {
                let mut values = Vec::<InputParamsValue>::with_capacity(arr.len());
                for v in arr {
                    match v.try_into() {
                        Ok(v) => values.push(v),
                        Err(e) => anyhow::bail!(format!("can't convert array element: {}", e)),
                    }
                }
                Ok(Self::Array(values))
            }
            serde_json::Value::Object(_) => {
                anyhow::bail!("can't convert to InputParamsValue from object json")
            }
        }
    }
}

impl TryFrom<&serde_json::Value> for InputParams {
    type Error = anyhow::Error;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        if let serde_json::Value::Object(value) = value {
            let mut params = HashMap::<String, InputParamsValue>::with_capacity(value.len());
            for (k, v) in value {
                // nested objects are looked up from the json value by their owners
                if v.is_object() {
                    continue;
                }
                match v.try_into() {
                    Ok(v) => {
                        params.insert(k.clone(), v);
                    }
                    Err(e) => anyhow::bail!(format!("can't convert member '{}': {}", k, e)),
                }
            }
            Ok(Self {
                params,
                name: Cow::Owned("".to_owned()),
                visited_names: HashSet::new(),
            })
        } else {
            anyhow::bail!("can't convert to InputParams from non-object json value");
        }
    }
}
