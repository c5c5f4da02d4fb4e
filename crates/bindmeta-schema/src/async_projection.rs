//! Async: projecting a callback-based native method as an awaitable one.
//!
//! The callback must be the final parameter. Its non-error parameters become
//! the awaited result; a trailing `NSError` parameter becomes the failure path.

use crate::declaration::{CallbackParameter, CallbackSignature, MemberDeclaration, TypeRef};
use crate::violation::failure_class;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AsyncMode {
    /// Result shape inferred from the callback signature.
    Inferred,
    /// Callback values are passed positionally to this type's constructor.
    ResultType { type_name: String },
    /// Explicit awaitable method name.
    MethodName { name: String },
}

/// Decides the construction mode from the raw attribute parameters.
///
/// An explicit result type together with an explicit method name is
/// ambiguous and rejected.
pub fn async_mode(
    result_type: Option<&str>,
    method_name: Option<&str>,
) -> Result<AsyncMode, String> {
    match (result_type, method_name) {
        (Some(type_name), Some(name)) => Err(format!(
            "result type `{type_name}` and method name `{name}` cannot both be supplied"
        )),
        (Some(type_name), None) => Ok(AsyncMode::ResultType {
            type_name: type_name.to_string(),
        }),
        (None, Some(name)) => Ok(AsyncMode::MethodName {
            name: name.to_string(),
        }),
        (None, None) => Ok(AsyncMode::Inferred),
    }
}

/// The four callback shapes inference understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackShape {
    NoArgs,
    ErrorOnly,
    Value,
    ValueAndError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AsyncResult {
    Unit,
    Single {
        #[serde(rename = "type")]
        type_ref: TypeRef,
    },
    Constructed {
        type_name: String,
        arguments: Vec<String>,
    },
    Synthesized {
        type_name: String,
        fields: Vec<CallbackParameter>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsyncProjection {
    pub method_name: String,
    pub mode: AsyncMode,
    pub shape: Option<CallbackShape>,
    pub result: AsyncResult,
    pub propagates_error: bool,
}

struct ClassifiedCallback<'a> {
    values: Vec<&'a CallbackParameter>,
    has_error: bool,
}

fn classify(callback: &CallbackSignature) -> Result<ClassifiedCallback<'_>, String> {
    let error_positions: Vec<usize> = callback
        .parameters
        .iter()
        .enumerate()
        .filter(|(_, param)| param.type_ref.is_error())
        .map(|(idx, _)| idx)
        .collect();
    if error_positions.len() > 1 {
        return Err("callback carries more than one error parameter".to_string());
    }
    if let Some(&position) = error_positions.first()
        && position + 1 != callback.parameters.len()
    {
        return Err("error parameter must be the last callback parameter".to_string());
    }
    Ok(ClassifiedCallback {
        values: callback
            .parameters
            .iter()
            .filter(|param| !param.type_ref.is_error())
            .collect(),
        has_error: !error_positions.is_empty(),
    })
}

fn shape_of(classified: &ClassifiedCallback<'_>) -> Option<CallbackShape> {
    match (classified.values.len(), classified.has_error) {
        (0, false) => Some(CallbackShape::NoArgs),
        (0, true) => Some(CallbackShape::ErrorOnly),
        (1, false) => Some(CallbackShape::Value),
        (1, true) => Some(CallbackShape::ValueAndError),
        _ => None,
    }
}

fn unit_or_single(classified: &ClassifiedCallback<'_>) -> AsyncResult {
    match classified.values.first() {
        Some(value) => AsyncResult::Single {
            type_ref: value.type_ref.clone(),
        },
        None => AsyncResult::Unit,
    }
}

/// Projects an `Async`-annotated method.
pub fn project_async(
    member: &MemberDeclaration,
    result_type: Option<&str>,
    method_name: Option<&str>,
    result_type_name: Option<&str>,
) -> Result<AsyncProjection, (&'static str, String)> {
    let mode = async_mode(result_type, method_name)
        .map_err(|reason| (failure_class::ASYNC_AMBIGUOUS_MODE, reason))?;

    let Some(callback) = member
        .parameters
        .last()
        .and_then(|param| param.type_ref.callback.as_ref())
    else {
        let reason = match member
            .parameters
            .iter()
            .find(|param| param.type_ref.callback.is_some())
        {
            Some(param) => format!(
                "callback parameter `{}` must be the final parameter",
                param.name
            ),
            None => "method has no callback parameter".to_string(),
        };
        return Err((failure_class::ASYNC_CALLBACK_NOT_LAST, reason));
    };

    let classified =
        classify(callback).map_err(|reason| (failure_class::ASYNC_UNSUPPORTED_SHAPE, reason))?;
    let shape = shape_of(&classified);

    let result = match &mode {
        AsyncMode::Inferred => {
            if shape.is_none() {
                return Err((
                    failure_class::ASYNC_UNSUPPORTED_SHAPE,
                    format!(
                        "inferred async supports at most one callback value, found {}; supply a result type or method name",
                        classified.values.len()
                    ),
                ));
            }
            unit_or_single(&classified)
        }
        AsyncMode::ResultType { type_name } => AsyncResult::Constructed {
            type_name: type_name.clone(),
            arguments: classified
                .values
                .iter()
                .map(|param| param.name.clone())
                .collect(),
        },
        AsyncMode::MethodName { .. } if classified.values.len() > 1 => {
            AsyncResult::Synthesized {
                type_name: result_type_name
                    .map(ToOwned::to_owned)
                    .unwrap_or_else(|| format!("{}Result", member.name)),
                fields: classified.values.iter().map(|param| (*param).clone()).collect(),
            }
        }
        AsyncMode::MethodName { .. } => unit_or_single(&classified),
    };

    let method_name = match &mode {
        AsyncMode::MethodName { name } => name.clone(),
        _ => format!("{}Async", member.name),
    };

    Ok(AsyncProjection {
        method_name,
        mode,
        shape,
        result,
        propagates_error: classified.has_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{MemberKind, ParameterDeclaration};

    fn callback_param(types: &[&str]) -> ParameterDeclaration {
        ParameterDeclaration {
            name: "completion".to_string(),
            type_ref: TypeRef {
                callback: Some(CallbackSignature {
                    parameters: types
                        .iter()
                        .enumerate()
                        .map(|(idx, name)| CallbackParameter {
                            name: format!("arg{idx}"),
                            type_ref: TypeRef::named(name),
                        })
                        .collect(),
                }),
                ..TypeRef::named("Action")
            },
            attributes: Vec::new(),
        }
    }

    fn method(parameters: Vec<ParameterDeclaration>) -> MemberDeclaration {
        MemberDeclaration {
            name: "Load".to_string(),
            kind: MemberKind::Method,
            attributes: Vec::new(),
            type_ref: None,
            parameters,
            return_value: None,
        }
    }

    #[test]
    fn infers_the_four_supported_shapes() {
        let cases: [(&[&str], CallbackShape); 4] = [
            (&[], CallbackShape::NoArgs),
            (&["NSError"], CallbackShape::ErrorOnly),
            (&["NSData"], CallbackShape::Value),
            (&["NSData", "NSError"], CallbackShape::ValueAndError),
        ];
        for (types, expected) in cases {
            let projection =
                project_async(&method(vec![callback_param(types)]), None, None, None).unwrap();
            assert_eq!(projection.shape, Some(expected));
            assert_eq!(projection.method_name, "LoadAsync");
        }
    }

    #[test]
    fn inferred_mode_rejects_multiple_values() {
        let (class, _) = project_async(
            &method(vec![callback_param(&["NSData", "NSString", "NSError"])]),
            None,
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(class, failure_class::ASYNC_UNSUPPORTED_SHAPE);
    }

    #[test]
    fn explicit_result_type_receives_values_positionally() {
        let projection = project_async(
            &method(vec![callback_param(&["NSData", "NSString", "NSError"])]),
            Some("LoadResult"),
            None,
            None,
        )
        .unwrap();
        assert_eq!(
            projection.result,
            AsyncResult::Constructed {
                type_name: "LoadResult".to_string(),
                arguments: vec!["arg0".to_string(), "arg1".to_string()],
            }
        );
        assert!(projection.propagates_error);
    }

    #[test]
    fn explicit_method_name_synthesizes_result_type() {
        let projection = project_async(
            &method(vec![callback_param(&["NSData", "NSString"])]),
            None,
            Some("FetchAsync"),
            None,
        )
        .unwrap();
        assert_eq!(projection.method_name, "FetchAsync");
        match projection.result {
            AsyncResult::Synthesized { type_name, fields } => {
                assert_eq!(type_name, "LoadResult");
                assert_eq!(fields.len(), 2);
            }
            other => panic!("expected synthesized result, got {other:?}"),
        }
    }

    #[test]
    fn result_type_and_method_name_together_are_rejected() {
        let (class, reason) = project_async(
            &method(vec![callback_param(&["NSData"])]),
            Some("LoadResult"),
            Some("FetchAsync"),
            None,
        )
        .unwrap_err();
        assert_eq!(class, failure_class::ASYNC_AMBIGUOUS_MODE);
        assert!(reason.contains("cannot both be supplied"));
    }

    #[test]
    fn callback_must_be_final_parameter() {
        let mut params = vec![callback_param(&[])];
        params.push(ParameterDeclaration {
            name: "flags".to_string(),
            type_ref: TypeRef::named("nuint"),
            attributes: Vec::new(),
        });
        let (class, reason) = project_async(&method(params), None, None, None).unwrap_err();
        assert_eq!(class, failure_class::ASYNC_CALLBACK_NOT_LAST);
        assert!(reason.contains("completion"));

        let (class, _) = project_async(&method(Vec::new()), None, None, None).unwrap_err();
        assert_eq!(class, failure_class::ASYNC_CALLBACK_NOT_LAST);
    }

    #[test]
    fn error_must_trail_the_callback() {
        let (class, _) = project_async(
            &method(vec![callback_param(&["NSError", "NSData"])]),
            None,
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(class, failure_class::ASYNC_UNSUPPORTED_SHAPE);
    }
}
