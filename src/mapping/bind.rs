//! Parameter binder: walks a type's plan table and builds the parameter set.

use super::field::{FieldRole, FieldSpec, FieldValue};
use super::ProcArgs;
use crate::command::ParamSet;

/// Build parameters for every input-role field of `args`, in declared order.
///
/// Output and excluded fields are skipped. Parameters are addressed by name,
/// so the construction order has no externally observable effect. No value
/// validation happens here; a malformed parameter is rejected by the driver,
/// not the binder.
pub fn bind_args<A: ProcArgs>(args: &A, params: &mut ParamSet) {
    for spec in A::fields() {
        if spec.role != FieldRole::Input {
            continue;
        }
        bind_field(spec, args.field_value(spec.name), params);
    }
}

fn bind_field(spec: &FieldSpec, value: FieldValue, params: &mut ParamSet) {
    match value {
        FieldValue::Int(v) => params.add_int(spec.name, v),
        FieldValue::NullableInt(v) => params.add_nullable_int(spec.name, v),
        FieldValue::SmallInt(v) => params.add_small_int(spec.name, v),
        FieldValue::NullableSmallInt(v) => params.add_nullable_small_int(spec.name, v),
        FieldValue::Bool(v) => params.add_bit(spec.name, v),
        FieldValue::NullableBool(Some(v)) => params.add_bit(spec.name, v),
        FieldValue::NullableBool(None) => match spec.default_if_null {
            Some(default) => params.add_bit_with_default(spec.name, None, default),
            None => params.add_nullable_bit(spec.name, None),
        },
        FieldValue::Text(v) => match spec.max_length {
            Some(n) => params.add_nvarchar(spec.name, v.as_deref(), n),
            None => params.add_nvarchar_max(spec.name, v.as_deref()),
        },
        FieldValue::DateTime(v) => params.add_datetime(spec.name, v),
        FieldValue::NullableDateTime(v) => params.add_nullable_datetime(spec.name, v),
        FieldValue::Time(v) => params.add_time(spec.name, v),
        FieldValue::NullableTime(v) => params.add_nullable_time(spec.name, v),
        FieldValue::Money(v) => params.add_money(spec.name, v),
        FieldValue::NullableMoney(v) => params.add_nullable_money(spec.name, v),
        FieldValue::Table(t) => params.add_table(spec.name, t),
        // Generic fallback: bind whatever value is present, skip if null.
        FieldValue::Other(Some(v)) => params.add_value(spec.name, v),
        FieldValue::Other(None) => {}
    }
}
