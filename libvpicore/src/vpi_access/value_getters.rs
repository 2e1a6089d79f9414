use super::*;

impl VpiEnv {
    /// Fills `record` in the format the caller put in `record.format`. A kind
    /// with no value turns the record into the `vpiSuppressVal` sentinel.
    pub fn get_value(&mut self, handle: HandleId, record: &mut ValueRecord) {
        match self.object(handle).value_source() {
            Some(src) => src.get_value(record),
            None => {
                record.format = ValueFormat::Suppress;
                record.payload = Payload::Empty;
            }
        }

        vpi_trace!(self.trace, "vpi_get_value({}) --> {}", handle, record);
    }

    pub fn get_value_int(&mut self, handle: HandleId) -> Option<i32> {
        let mut record = ValueRecord::request(ValueFormat::Int);
        self.get_value(handle, &mut record);
        record.as_int()
    }
}

macro_rules! gen_get_value_str {
    ($($suffix:ident => $format:ident),* $(,)?) => {
        // Generate:
        //      get_value_<bin/oct/dec/hex>_str
        paste::paste! {
            impl VpiEnv {
                $(
                    pub fn [<get_value_ $suffix>](&mut self, handle: HandleId) -> Option<String> {
                        let mut record = ValueRecord::request(ValueFormat::$format);
                        self.get_value(handle, &mut record);
                        match record.payload {
                            Payload::Text(s) => Some(s),
                            _ => None,
                        }
                    }
                )*
            }
        }
    };
}

gen_get_value_str!(
    bin_str => BinStr,
    oct_str => OctStr,
    dec_str => DecStr,
    hex_str => HexStr,
);
