use toml::Value;

//
// Conversions from descriptor scalars to C++ literals
//

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Indent(pub usize);

impl Indent {
    pub fn next(self) -> Indent {
        Indent(self.0 + 1)
    }
}

impl std::fmt::Display for Indent {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        for _ in 0..self.0 {
            f.write_str("\t")?;
        }
        Ok(())
    }
}

/// Named symbolic constants a descriptor string is translated to
pub struct EnumTable {
    pub name: &'static str,
    pub entries: &'static [(&'static str, &'static str)],
}

impl EnumTable {
    pub fn constant(
        &self,
        symbol: &str,
    ) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == symbol)
            .map(|(_, constant)| *constant)
    }

    fn symbols(&self) -> String {
        self.entries
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join("|")
    }
}

pub const BORDER_PIVOT: EnumTable = EnumTable {
    name: "border pivot",
    entries: &[
        ("inner", "eng::rendering::BorderPivot::INNER"),
        ("middle", "eng::rendering::BorderPivot::MIDDLE"),
        ("outer", "eng::rendering::BorderPivot::OUTER"),
    ],
};

pub const HORIZONTAL_ALIGNMENT: EnumTable = EnumTable {
    name: "horizontal alignment",
    entries: &[
        ("left", "eng::rendering::Paragraph::HorizontalAlignment::LEFT"),
        ("center", "eng::rendering::Paragraph::HorizontalAlignment::CENTER"),
        ("right", "eng::rendering::Paragraph::HorizontalAlignment::RIGHT"),
        ("justify", "eng::rendering::Paragraph::HorizontalAlignment::JUSTIFY"),
    ],
};

pub const VERTICAL_ALIGNMENT: EnumTable = EnumTable {
    name: "vertical alignment",
    entries: &[
        ("top", "eng::rendering::Paragraph::VerticalAlignment::TOP"),
        ("middle", "eng::rendering::Paragraph::VerticalAlignment::MIDDLE"),
        ("bottom", "eng::rendering::Paragraph::VerticalAlignment::BOTTOM"),
        ("justify", "eng::rendering::Paragraph::VerticalAlignment::JUSTIFY"),
    ],
};

pub const FRAME_FORMAT_MODE: EnumTable = EnumTable {
    name: "frame format mode",
    entries: &[
        ("single", "eng::graphics::AnimFrameFormat::Mode::SINGLE"),
        ("auto", "eng::graphics::AnimFrameFormat::Mode::AUTO"),
    ],
};

pub fn real(value: &Value) -> Result<String, String> {
    match value {
        Value::Integer(x) => Ok(format!("(float){}", x)),
        Value::Float(x) if x.is_finite() => Ok(format!("(float){}", x)),
        Value::Float(x) => Err(format!("{} is not a finite number", x)),
        other => Err(format!("expected a number, found {}", other.type_str())),
    }
}

pub fn int(value: &Value) -> Result<String, String> {
    match value {
        Value::Integer(x) => Ok(x.to_string()),
        other => Err(format!("expected an integer, found {}", other.type_str())),
    }
}

pub fn uint(value: &Value) -> Result<String, String> {
    match value {
        Value::Integer(x) if *x >= 0 => Ok(format!("{}u", x)),
        Value::Integer(x) => Err(format!("expected a non-negative integer, found {}", x)),
        other => Err(format!("expected an integer, found {}", other.type_str())),
    }
}

pub fn boolean(value: &Value) -> Result<String, String> {
    match value {
        Value::Boolean(x) => Ok(x.to_string()),
        other => Err(format!("expected a boolean, found {}", other.type_str())),
    }
}

/// Quotes a string, escaping the characters that can't appear raw in a C++ string literal
pub fn escape_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len() + 2);
    escaped.push('"');
    for c in s.chars() {
        match c {
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            c => escaped.push(c),
        }
    }
    escaped.push('"');
    escaped
}

pub fn string(value: &Value) -> Result<String, String> {
    match value {
        Value::String(x) => Ok(escape_string(x)),
        other => Err(format!("expected a string, found {}", other.type_str())),
    }
}

fn fixed_array<'a>(
    value: &'a Value,
    len: usize,
) -> Result<&'a [Value], String> {
    match value {
        Value::Array(x) if x.len() == len => Ok(x.as_slice()),
        Value::Array(x) => Err(format!("expected {} elements, found {}", len, x.len())),
        other => Err(format!("expected an array, found {}", other.type_str())),
    }
}

fn aggregate(
    value: &Value,
    len: usize,
    element: fn(&Value) -> Result<String, String>,
) -> Result<String, String> {
    let elements = fixed_array(value, len)?
        .iter()
        .map(element)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("{{ {} }}", elements.join(", ")))
}

/// `[x, y]` -> `{ (float)x, (float)y }`
pub fn pair(value: &Value) -> Result<String, String> {
    aggregate(value, 2, real)
}

/// `[x, y]` -> `{ x, y }`
pub fn int_pair(value: &Value) -> Result<String, String> {
    aggregate(value, 2, int)
}

/// `[a, b, c, d]` -> `{ (float)a, (float)b, (float)c, (float)d }`
pub fn quad(value: &Value) -> Result<String, String> {
    aggregate(value, 4, real)
}

pub fn enum_constant(
    table: &EnumTable,
    value: &Value,
) -> Result<String, String> {
    match value {
        Value::String(x) => table.constant(x).map(|x| x.to_string()).ok_or_else(|| {
            format!(
                "{:?} is not a valid {} (expected {})",
                x,
                table.name,
                table.symbols()
            )
        }),
        other => Err(format!("expected a {}, found {}", table.name, other.type_str())),
    }
}

/// Numbers are taken as-is, strings are looked up in the table
pub fn real_or_enum(
    table: &EnumTable,
    value: &Value,
) -> Result<String, String> {
    match value {
        Value::String(_) => enum_constant(table, value),
        _ => real(value),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn numbers_cast_to_float() {
        assert_eq!(real(&Value::Integer(3)).unwrap(), "(float)3");
        assert_eq!(real(&Value::Float(-0.25)).unwrap(), "(float)-0.25");
        assert_eq!(real(&Value::Float(2.0)).unwrap(), "(float)2");
        assert!(real(&Value::Float(f64::NAN)).is_err());
        assert!(real(&Value::String("1".to_string())).is_err());
    }

    #[test]
    fn aggregates() {
        let value = Value::Array(vec![Value::Integer(1), Value::Float(2.5)]);
        assert_eq!(pair(&value).unwrap(), "{ (float)1, (float)2.5 }");
        assert!(quad(&value).is_err());

        let tile = Value::Array(vec![Value::Integer(4), Value::Integer(-1)]);
        assert_eq!(int_pair(&tile).unwrap(), "{ 4, -1 }");
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(
            escape_string("a\tb\nc\rd \"q\" \\"),
            "\"a\\tb\\nc\\rd \\\"q\\\" \\\\\""
        );
    }

    #[test]
    fn enums_translate_to_constants() {
        let outer = Value::String("outer".to_string());
        assert_eq!(
            enum_constant(&BORDER_PIVOT, &outer).unwrap(),
            "eng::rendering::BorderPivot::OUTER"
        );

        let error = enum_constant(&BORDER_PIVOT, &Value::String("sideways".to_string())).unwrap_err();
        assert!(error.contains("inner|middle|outer"));

        assert_eq!(
            real_or_enum(&BORDER_PIVOT, &Value::Float(0.5)).unwrap(),
            "(float)0.5"
        );
    }

    #[test]
    fn unsigned_rejects_negatives() {
        assert_eq!(uint(&Value::Integer(7)).unwrap(), "7u");
        assert!(uint(&Value::Integer(-7)).is_err());
    }

    #[test]
    fn indent_renders_tabs() {
        assert_eq!(format!("{}x", Indent(2)), "\t\tx");
        assert_eq!(Indent::default().next().0, 1);
    }
}
