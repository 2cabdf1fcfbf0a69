use classforge::dynamic::{Settings, TypeWriter};
use classforge::jvm::class_graph::{ClassGraph, ClassGraphArenas, ClassId, JavaLibrary};
use classforge::jvm::{
    BaseType, BinaryName, FieldType, MethodAccessFlags, MethodDescriptor, Name, ParseDescriptor,
    UnqualifiedName,
};
use classforge::stack::constant::{
    ClassConstant, DoubleConstant, FloatConstant, IntegerConstant, LongConstant, TextConstant,
};
use classforge::stack::member::MethodReturn;
use classforge::stack::StackManipulation;
use classforge::Error;

use clap::{value_parser, Arg, ArgAction, Command};

fn main() -> Result<(), Error> {
    env_logger::init();

    let matches = Command::new("JVM constant class generator")
        .version(clap::crate_version!())
        .about("Generates a class whose static methods return the given constants")
        .arg(
            Arg::new("output class")
                .long("output-class")
                .value_name("CLASS_NAME")
                .help("Binary name of the generated class, eg. `me/example/Constants`")
                .required(true),
        )
        .arg(
            Arg::new("value")
                .long("value")
                .value_name("NAME:TYPE:LITERAL")
                .help(
                    "Static method returning a constant. TYPE is one of boolean, byte, short, \
                     char, int, long, float, double, string, or class. A class LITERAL is a field \
                     descriptor, eg. `Ljava/util/List;`, `[I`, or `J`",
                )
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("cache")
                .long("cache")
                .help("Compute each constant once, in the type initializer")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("cached field prefix")
                .long("cached-field-prefix")
                .value_name("PREFIX")
                .requires("cache"),
        )
        .arg(
            Arg::new("target")
                .long("target")
                .value_name("RELEASE")
                .help("Java SE release to target (6 to 17)")
                .value_parser(value_parser!(u16))
                .default_value("8"),
        )
        .arg(
            Arg::new("output directory")
                .long("output-dir")
                .value_name("DIRECTORY")
                .default_value("."),
        )
        .get_matches();

    let output_class = matches
        .get_one::<String>("output class")
        .cloned()
        .unwrap_or_default();
    let release = matches.get_one::<u16>("target").copied().unwrap_or(8);
    let mut settings = Settings::new(output_class)?.with_java_release(release)?;
    if let Some(prefix) = matches.get_one::<String>("cached field prefix") {
        settings = settings.with_cached_field_prefix(prefix.clone())?;
    }
    let cache = matches.get_flag("cache");

    let class_graph_arenas = ClassGraphArenas::new();
    let class_graph = ClassGraph::new(&class_graph_arenas);
    let java = class_graph.insert_java_library_types();
    let mut writer = TypeWriter::new(settings, &class_graph, &java)?;

    let values = matches
        .get_many::<String>("value")
        .into_iter()
        .flatten();
    for value in values {
        let (name, field_type, constant) = parse_value(&class_graph, &java, value)?;
        let constant = if cache {
            constant.cached(field_type)
        } else {
            constant
        };

        log::info!("Adding '{}' returning {:?}", name.as_str(), field_type);
        let method = writer.define_method(
            name,
            MethodDescriptor {
                parameters: vec![],
                return_type: Some(field_type),
            },
            MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
        );
        let body = StackManipulation::Compound(vec![
            constant,
            MethodReturn::returning(Some(&field_type)).into(),
        ]);
        writer.implement_method(method, &body)?;
    }

    let output_directory = matches
        .get_one::<String>("output directory")
        .cloned()
        .unwrap_or_else(|| String::from("."));
    let dynamic_type = writer.make()?;
    let path = dynamic_type.save_to_path(&output_directory)?;
    log::info!("Wrote '{}'", path.display());

    Ok(())
}

/// Parse `NAME:TYPE:LITERAL` into a method name, its return type, and the constant to return
fn parse_value<'g>(
    class_graph: &'g ClassGraph<'g>,
    java: &JavaLibrary<'g>,
    value: &str,
) -> Result<(UnqualifiedName, FieldType<ClassId<'g>>, StackManipulation<'g>), Error> {
    let mut parts = value.splitn(3, ':');
    let (name, typ, literal) = match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(typ), Some(literal)) => (name, typ, literal),
        _ => {
            return Err(Error::InvalidSettings(format!(
                "expected NAME:TYPE:LITERAL, got '{}'",
                value
            )))
        }
    };
    let name = UnqualifiedName::from_string(name.to_owned()).map_err(Error::InvalidSettings)?;
    let malformed = || Error::InvalidSettings(format!("malformed {} literal '{}'", typ, literal));

    let (field_type, constant): (FieldType<ClassId<'g>>, StackManipulation<'g>) = match typ {
        "boolean" => {
            let value: bool = literal.parse().map_err(|_| malformed())?;
            (FieldType::boolean(), IntegerConstant::for_boolean(value).into())
        }
        "byte" | "short" | "int" => {
            let primitive = match typ {
                "byte" => BaseType::Byte,
                "short" => BaseType::Short,
                _ => BaseType::Int,
            };
            let value: i64 = literal.parse().map_err(|_| malformed())?;
            let constant = IntegerConstant::for_primitive(value, primitive)?;
            (FieldType::Base(primitive), constant.into())
        }
        "char" => {
            let mut chars = literal.chars();
            let value = match (chars.next(), chars.next()) {
                (Some(c), None) => c as i64,
                _ => return Err(malformed()),
            };
            let constant = IntegerConstant::for_primitive(value, BaseType::Char)?;
            (FieldType::char(), constant.into())
        }
        "long" => {
            let value: i64 = literal.parse().map_err(|_| malformed())?;
            (FieldType::long(), LongConstant::for_value(value).into())
        }
        "float" => {
            let value: f32 = literal.parse().map_err(|_| malformed())?;
            (FieldType::float(), FloatConstant::for_value(value).into())
        }
        "double" => {
            let value: f64 = literal.parse().map_err(|_| malformed())?;
            (FieldType::double(), DoubleConstant::for_value(value).into())
        }
        "string" => (
            FieldType::object(java.classes.lang.string),
            TextConstant::new(literal).into(),
        ),
        "class" => {
            let descriptor =
                FieldType::<BinaryName>::parse(literal).map_err(Error::InvalidSettings)?;
            let field_type = descriptor.map(|name| {
                class_graph.lookup_or_add_class(name.clone(), java.classes.lang.object)
            });
            (
                FieldType::object(java.classes.lang.class),
                ClassConstant::of(java, &field_type).into(),
            )
        }
        other => {
            return Err(Error::InvalidSettings(format!(
                "unknown constant type '{}'",
                other
            )))
        }
    };

    Ok((name, field_type, constant))
}

#[cfg(test)]
mod test {
    use super::*;
    use classforge::jvm::RefType;

    fn class_literal<'g>(
        class_graph: &'g ClassGraph<'g>,
        java: &JavaLibrary<'g>,
        literal: &str,
    ) -> Result<StackManipulation<'g>, Error> {
        let (_, field_type, constant) =
            parse_value(class_graph, java, &format!("klass:class:{}", literal))?;
        assert_eq!(field_type, FieldType::object(java.classes.lang.class));
        Ok(constant)
    }

    #[test]
    fn class_literals_are_field_descriptors() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();

        assert_eq!(
            class_literal(&class_graph, &java, "Ljava/lang/String;").unwrap(),
            StackManipulation::from(ClassConstant::Literal(RefType::Object(
                java.classes.lang.string
            )))
        );
        assert_eq!(
            class_literal(&class_graph, &java, "[I").unwrap(),
            StackManipulation::from(ClassConstant::Literal(RefType::array(FieldType::int())))
        );
        assert_eq!(
            class_literal(&class_graph, &java, "J").unwrap(),
            StackManipulation::from(ClassConstant::of(&java, &FieldType::long()))
        );

        // Unknown classes are added to the graph
        class_literal(&class_graph, &java, "[Lme/example/Missing;").unwrap();
        let missing = BinaryName::from_string(String::from("me/example/Missing")).unwrap();
        assert!(class_graph.lookup_class(&missing).is_some());

        assert!(class_literal(&class_graph, &java, "java/lang/String").is_err());
        assert!(class_literal(&class_graph, &java, "V").is_err());
    }

    #[test]
    fn malformed_values() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();

        assert!(parse_value(&class_graph, &java, "answer:int").is_err());
        assert!(parse_value(&class_graph, &java, "answer:int:forty").is_err());
        assert!(parse_value(&class_graph, &java, "answer:byte:300").is_err());
        assert!(parse_value(&class_graph, &java, "answer:char:ab").is_err());
        assert!(parse_value(&class_graph, &java, "answer:void:0").is_err());

        let (name, field_type, _) = parse_value(&class_graph, &java, "greeting:string:a:b").unwrap();
        assert_eq!(name.as_str(), "greeting");
        assert_eq!(field_type, FieldType::object(java.classes.lang.string));
    }
}
