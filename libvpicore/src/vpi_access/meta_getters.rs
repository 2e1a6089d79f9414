use super::*;

impl VpiEnv {
    /// Integer property of `handle`, or of the simulation when `handle` is
    /// `None` (only `vpiTimePrecision` is defined there).
    pub fn get(&mut self, prop: Property, handle: Option<HandleId>) -> i32 {
        let Some(id) = handle else {
            let value = match prop {
                Property::TimePrecision => self.precision,
                other => crate::contract_violation!(
                    "vpi_get({}, null): no global value for this property",
                    other
                ),
            };
            vpi_trace!(self.trace, "vpi_get(null, {}) --> {}", prop, value);
            return value;
        };

        let value = {
            let obj = self.object(id);
            if prop == Property::Type {
                obj.reported_type().code()
            } else {
                let cx = self.kind_context();
                obj.properties()
                    .and_then(|p| p.get(prop, &cx))
                    .unwrap_or(Property::UNDEFINED_VALUE)
            }
        };

        vpi_trace!(self.trace, "vpi_get({}, {}) --> {}", id, prop, value);
        value
    }

    #[inline(always)]
    pub fn get_raw(&mut self, code: i32, handle: Option<HandleId>) -> i32 {
        self.get(Property(code), handle)
    }

    /// String property of `handle`. A null handle is reported and yields `None`.
    pub fn get_str(&mut self, prop: Property, handle: Option<HandleId>) -> Option<String> {
        let Some(id) = handle else {
            log::error!("vpi_get_str({}): called with a null handle", prop);
            vpi_trace!(self.trace, "vpi_get_str(null, {}) --> null", prop);
            return None;
        };

        let value = {
            let obj = self.object(id);
            if prop == Property::Type {
                Some(obj.reported_type().name().to_string())
            } else {
                let cx = self.kind_context();
                obj.properties().and_then(|p| p.get_str(prop, id, &cx))
            }
        };

        vpi_trace!(self.trace, "vpi_get_str({}, {}) --> {}", id, prop, quoted(&value));
        value
    }

    #[inline(always)]
    pub fn get_str_raw(&mut self, code: i32, handle: Option<HandleId>) -> Option<String> {
        self.get_str(Property(code), handle)
    }

    /// Table of a scope's members (name, type, size). `None` if `scope` is
    /// not a scope.
    pub fn describe_scope(&self, scope: HandleId) -> Option<String> {
        use tabled::{
            builder::Builder,
            settings::{Panel, Style},
        };

        let members = &self.objects.scope(scope)?.members;
        let cx = self.kind_context();

        let mut builder = Builder::new();
        builder.push_record(["name", "type", "size"]);
        for member in members {
            let obj = self.object(*member);
            let name = obj.name().map_or("", |n| self.strings.resolve(n));
            let size = obj
                .properties()
                .and_then(|p| p.get(Property::Size, &cx))
                .map_or_else(|| "--".to_string(), |s| s.to_string());
            builder.push_record([name, obj.reported_type().name(), size.as_str()]);
        }

        let title = cx.full_name(scope).unwrap_or_default();
        let mut table = builder.build();
        table.with(Panel::header(title)).with(Style::modern());
        Some(table.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vpi_callback::TickQueue;

    fn design() -> (VpiEnv, HandleId, HandleId, HandleId) {
        let mut env = VpiEnv::with_kernel(TickQueue::new());
        let top = env.add_root_module("top", "tb_top", -9, -12);
        let count = env.add_integer(top, "count");
        let data = env.add_reg(top, "data", 7, 0, false);
        (env, top, count, data)
    }

    #[test]
    fn test_type_override_for_integers() {
        let (mut env, _, count, data) = design();
        assert_eq!(env.get(Property::Type, Some(count)), ObjectType::IntegerVar.code());
        assert_eq!(env.get_str(Property::Type, Some(count)).as_deref(), Some("vpiIntegerVar"));
        assert_eq!(env.get(Property::Type, Some(data)), ObjectType::Reg.code());
    }

    #[test]
    fn test_properties_and_sentinels() {
        let (mut env, top, _, data) = design();
        assert_eq!(env.get(Property::Size, Some(data)), 8);
        assert_eq!(env.get(Property::LeftRange, Some(data)), 7);
        assert_eq!(env.get(Property::TopModule, Some(top)), 1);
        assert_eq!(env.get(Property::Size, Some(top)), Property::UNDEFINED_VALUE);
        assert_eq!(env.get_raw(4242, Some(data)), -1);
        assert_eq!(env.get_str(Property::FullName, Some(data)).as_deref(), Some("top.data"));
        assert_eq!(env.get_str(Property::DefName, Some(top)).as_deref(), Some("tb_top"));
        assert_eq!(env.get_str_raw(4242, Some(data)), None);
        assert_eq!(env.get(Property::TimePrecision, None), -12);
    }

    #[test]
    fn test_get_str_null_handle_is_soft() {
        let (mut env, ..) = design();
        assert_eq!(env.get_str(Property::Name, None), None);
    }

    #[test]
    #[should_panic(expected = "no global value")]
    fn test_unknown_global_property_is_fatal() {
        let (mut env, ..) = design();
        env.get(Property::Size, None);
    }

    #[test]
    fn test_describe_scope() {
        let (env, top, count, _) = design();
        let table = env.describe_scope(top).unwrap();
        assert!(table.contains("top"));
        assert!(table.contains("count"));
        assert!(table.contains("vpiIntegerVar"));
        assert!(table.contains("vpiReg"));
        assert!(env.describe_scope(count).is_none());
    }
}
