use classforge::dynamic::{Settings, TypeWriter};
use classforge::jvm::class_file::ClassFile;
use classforge::jvm::class_graph::{ClassGraph, ClassGraphArenas, ClassId, MethodId};
use classforge::jvm::{FieldType, MethodAccessFlags, MethodDescriptor, Name, UnqualifiedName};
use classforge::stack::assign::{Typing, VoidAwareAssigner};
use classforge::stack::constant::{IntegerConstant, MethodConstant, TextConstant};
use classforge::stack::member::{MethodReturn, MethodVariableAccess};
use classforge::stack::StackManipulation;
use classforge::{jvm, Error};
use std::fs;

fn occurrences(haystack: &[u8], needle: &str) -> usize {
    haystack
        .windows(needle.len())
        .filter(|window| *window == needle.as_bytes())
        .count()
}

fn static_method<'g>(
    writer: &mut TypeWriter<'_, 'g>,
    name: &str,
    parameters: Vec<FieldType<ClassId<'g>>>,
    return_type: FieldType<ClassId<'g>>,
) -> MethodId<'g> {
    writer.define_method(
        UnqualifiedName::from_string(String::from(name)).unwrap(),
        MethodDescriptor {
            parameters,
            return_type: Some(return_type),
        },
        MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
    )
}

#[test]
fn constant_returning_class() {
    let arenas = ClassGraphArenas::new();
    let class_graph = ClassGraph::new(&arenas);
    let java = class_graph.insert_java_library_types();
    let settings = Settings::new("me/example/Answer").unwrap();
    let mut writer = TypeWriter::new(settings, &class_graph, &java).unwrap();

    let answer = static_method(&mut writer, "answer", vec![], FieldType::int());
    let body = StackManipulation::Compound(vec![
        IntegerConstant::for_value(42).into(),
        MethodReturn::Integer.into(),
    ]);
    writer.implement_method(answer, &body).unwrap();

    let dynamic_type = writer.make().unwrap();
    let bytes = &dynamic_type.bytes;
    assert_eq!(dynamic_type.name.as_str(), "me/example/Answer");
    assert_eq!(bytes[0..4], ClassFile::MAGIC);
    assert_eq!(bytes[4..8], [0, 0, 0, 52]);
    assert_eq!(occurrences(bytes, "me/example/Answer"), 1);
    assert_eq!(occurrences(bytes, "answer"), 1);

    // No cached constants means no type initializer
    assert_eq!(occurrences(bytes, "<clinit>"), 0);
}

#[test]
fn cached_constants_share_one_field() {
    let arenas = ClassGraphArenas::new();
    let class_graph = ClassGraph::new(&arenas);
    let java = class_graph.insert_java_library_types();
    let settings = Settings::new("me/example/Reflected")
        .unwrap()
        .with_java_release(11)
        .unwrap();
    let mut writer = TypeWriter::new(settings, &class_graph, &java).unwrap();

    let value_of = MethodConstant::for_method(&java, java.members.lang.integer.value_of).unwrap();
    let method_type = value_of.reflected_type();
    let cached = value_of.cached();

    for name in ["first", "second"] {
        let method = static_method(&mut writer, name, vec![], method_type);
        let body = StackManipulation::Compound(vec![cached.clone(), MethodReturn::Reference.into()]);
        writer.implement_method(method, &body).unwrap();
    }

    let greeting = static_method(
        &mut writer,
        "greeting",
        vec![],
        FieldType::object(java.classes.lang.string),
    );
    let body = StackManipulation::Compound(vec![
        StackManipulation::from(TextConstant::new("hello"))
            .cached(FieldType::object(java.classes.lang.string)),
        MethodReturn::Reference.into(),
    ]);
    writer.implement_method(greeting, &body).unwrap();
    assert_eq!(writer.context().len(), 2);

    let dynamic_type = writer.make().unwrap();
    let bytes = &dynamic_type.bytes;
    assert_eq!(bytes[4..8], [0, 0, 0, 55]);
    assert_eq!(occurrences(bytes, "cachedValue$0"), 1);
    assert_eq!(occurrences(bytes, "cachedValue$1"), 1);
    assert_eq!(occurrences(bytes, "cachedValue$2"), 0);
    assert_eq!(occurrences(bytes, "<clinit>"), 1);
    assert_eq!(occurrences(bytes, "getDeclaredMethod"), 1);
}

#[test]
fn oversized_string_constant() {
    let arenas = ClassGraphArenas::new();
    let class_graph = ClassGraph::new(&arenas);
    let java = class_graph.insert_java_library_types();
    let settings = Settings::new("me/example/Huge").unwrap();
    let mut writer = TypeWriter::new(settings, &class_graph, &java).unwrap();

    let string = FieldType::object(java.classes.lang.string);
    let method = static_method(&mut writer, "huge", vec![], string);
    let body = StackManipulation::Compound(vec![
        TextConstant::new("a".repeat(70_000)).into(),
        MethodReturn::Reference.into(),
    ]);

    let result = writer
        .implement_method(method, &body)
        .and_then(|()| writer.make());
    match result {
        Err(Error::BytecodeGen(jvm::Error::Utf8ConstantTooLong(70_000))) => (),
        Err(err) => panic!("unexpected error {:?}", err),
        Ok(_) => panic!("a 70000 byte string cannot be a class file constant"),
    }
}

#[test]
fn boxing_method() {
    let arenas = ClassGraphArenas::new();
    let class_graph = ClassGraph::new(&arenas);
    let java = class_graph.insert_java_library_types();
    let settings = Settings::new("me/example/Boxes").unwrap();
    let mut writer = TypeWriter::new(settings, &class_graph, &java).unwrap();

    let object = FieldType::object(java.classes.lang.object);
    let method = static_method(&mut writer, "box", vec![FieldType::long()], object);

    let assigner = VoidAwareAssigner::default_chain(&java);
    let conversion = assigner.assign(Some(&FieldType::long()), Some(&object), Typing::Static);
    assert!(conversion.is_valid());
    let body = StackManipulation::Compound(vec![
        MethodVariableAccess::load_arguments(method),
        conversion,
        MethodReturn::Reference.into(),
    ]);
    writer.implement_method(method, &body).unwrap();

    let dynamic_type = writer.make().unwrap();
    assert_eq!(occurrences(&dynamic_type.bytes, "(J)Ljava/lang/Long;"), 1);
    assert_eq!(occurrences(&dynamic_type.bytes, "(J)Ljava/lang/Object;"), 1);
    assert_eq!(occurrences(&dynamic_type.bytes, "valueOf"), 1);
}

#[test]
fn saved_under_package_directories() {
    let arenas = ClassGraphArenas::new();
    let class_graph = ClassGraph::new(&arenas);
    let java = class_graph.insert_java_library_types();
    let settings = Settings::new("me/example/Saved").unwrap();
    let writer = TypeWriter::new(settings, &class_graph, &java).unwrap();
    let dynamic_type = writer.make().unwrap();

    let directory = std::env::temp_dir().join(format!("classforge-test-{}", std::process::id()));
    let path = dynamic_type.save_to_path(&directory).unwrap();
    assert_eq!(path, directory.join("me/example/Saved.class"));
    assert_eq!(fs::read(&path).unwrap(), dynamic_type.bytes);
    fs::remove_dir_all(&directory).unwrap();
}
