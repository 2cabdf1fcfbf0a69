//! Manipulate JVM classes
//!
//! This is the back end that the stack manipulations in [`crate::stack`] emit into: a class graph
//! describing types and members, symbolic instructions, and the class file format itself.
//!
//! ### Simple example
//!
//! Consider the following simple Java class:
//!
//! ```java,ignore,no_run
//! public class Answer {
//!     public static int get() {
//!         return 42;
//!     }
//! }
//! ```
//!
//! Generating an analogous class file by hand can be done as follows:
//!
//! ```
//! use classforge::jvm::class_graph::*;
//! use classforge::jvm::model::{Method, Class};
//! use classforge::jvm::code::{CodeBuilder, Instruction::*, InstructionSink};
//! use classforge::jvm::class_file::{ClassFile, Serialize, Version};
//! use classforge::jvm::*;
//!
//! # fn generate_class() -> Result<(), Error> {
//! // Setup the class graph, add in Java standard library types
//! let class_graph_arenas = ClassGraphArenas::new();
//! let class_graph = ClassGraph::new(&class_graph_arenas);
//! let java = class_graph.insert_java_library_types();
//!
//! // Declare the class and its method in the class graph
//! let class = class_graph.add_class(ClassData::new(
//!     BinaryName::from_string(String::from("me/example/Answer")).unwrap(),
//!     java.classes.lang.object,
//!     ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
//! ));
//! let get = class_graph.add_method(MethodData {
//!     class,
//!     name: UnqualifiedName::from_string(String::from("get")).unwrap(),
//!     descriptor: MethodDescriptor {
//!         parameters: vec![],
//!         return_type: Some(FieldType::int()),
//!     },
//!     access_flags: MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
//! });
//!
//! // Generate the method body
//! let mut code = CodeBuilder::new(get);
//! code.push_instruction(BiPush(42))?;
//! code.push_instruction(IReturn)?;
//!
//! // Add the method to the class, then encode the class into bytes
//! let mut class = Class::new(class);
//! let mut method = Method::new(get);
//! method.code_impl = Some(code.result(1)?);
//! class.add_method(method);
//!
//! let class_file: ClassFile = class.serialize(Version::JAVA8)?;
//! let mut class_bytes: Vec<u8> = vec![];
//! class_file.serialize(&mut class_bytes).map_err(Error::IoError)?;
//! # Ok(())
//! # }
//! # generate_class().unwrap();
//! ```

mod access_flags;
pub mod class_file;
pub mod class_graph;
pub mod code;
mod descriptors;
mod errors;
pub mod model;
mod names;

pub use access_flags::*;
pub use descriptors::*;
pub use errors::*;
pub use names::*;
