use std::collections::HashMap;

use nalgebra::Matrix4;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGlBuffer, WebGlProgram, WebGlRenderingContext, WebGlUniformLocation};

use crate::engine::mesh::{Mesh, FLOATS_PER_VERTEX};
use crate::game::draw::{DrawPrimitive, Material, Primitive};
use crate::game::pose::Pose;

const VERTEX_SHADER: &str = r#"
    attribute vec3 aPosition;
    attribute vec3 aShade;
    uniform mat4 uModelViewProjection;
    varying vec3 vShade;
    varying float vHeight;
    void main() {
        gl_Position = uModelViewProjection * vec4(aPosition, 1.0);
        vShade = aShade;
        vHeight = aPosition.y;
    }
"#;

const FRAGMENT_SHADER: &str = r#"
    precision mediump float;
    varying vec3 vShade;
    varying float vHeight;
    uniform vec3 uColor;

    void main() {
        vec3 color = uColor * vShade;

        // Cheap ambient occlusion: darken towards the bottom of each shape
        float ao = mix(0.75, 1.0, smoothstep(-0.5, 0.5, vHeight));
        gl_FragColor = vec4(color * ao, 1.0);
    }
"#;

struct GpuMesh {
    vertex_buffer: WebGlBuffer,
    index_buffer: WebGlBuffer,
    index_count: i32,
}

pub struct Renderer {
    pub gl: WebGlRenderingContext,
    program: WebGlProgram,
    mvp_location: WebGlUniformLocation,
    color_location: WebGlUniformLocation,
    meshes: HashMap<Primitive, GpuMesh>,
}

impl Renderer {
    pub fn new(gl: WebGlRenderingContext) -> Result<Self, JsValue> {
        let program = create_program(&gl)?;
        gl.use_program(Some(&program));

        let mvp_location = gl.get_uniform_location(&program, "uModelViewProjection")
            .ok_or("Failed to get uModelViewProjection location")?;
        let color_location = gl.get_uniform_location(&program, "uColor")
            .ok_or("Failed to get uColor location")?;

        let mut meshes = HashMap::new();
        for primitive in [Primitive::Cube, Primitive::Pad] {
            meshes.insert(primitive, upload(&gl, &Mesh::for_primitive(primitive))?);
        }

        Ok(Renderer { gl, program, mvp_location, color_location, meshes })
    }

    pub fn clear(&self, r: f32, g: f32, b: f32) {
        self.gl.clear_color(r, g, b, 1.0);
        self.gl.clear(WebGlRenderingContext::COLOR_BUFFER_BIT | WebGlRenderingContext::DEPTH_BUFFER_BIT);
    }

    pub fn enable_depth_test(&self) {
        self.gl.enable(WebGlRenderingContext::DEPTH_TEST);
    }

    pub fn resize(&self, width: i32, height: i32) {
        self.gl.viewport(0, 0, width, height);
    }

    pub fn canvas(&self) -> Option<HtmlCanvasElement> {
        self.gl.canvas()?.dyn_into::<HtmlCanvasElement>().ok()
    }

    pub fn draw(&self, primitive: Primitive, model: &Matrix4<f32>, color: (f32, f32, f32), view_projection: &Matrix4<f32>) {
        let Some(mesh) = self.meshes.get(&primitive) else {
            return;
        };
        self.gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&mesh.vertex_buffer));
        self.gl.bind_buffer(WebGlRenderingContext::ELEMENT_ARRAY_BUFFER, Some(&mesh.index_buffer));

        let stride = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as i32;
        let pos_loc = self.gl.get_attrib_location(&self.program, "aPosition") as u32;
        let shade_loc = self.gl.get_attrib_location(&self.program, "aShade") as u32;

        self.gl.vertex_attrib_pointer_with_i32(pos_loc, 3, WebGlRenderingContext::FLOAT, false, stride, 0);
        self.gl.enable_vertex_attrib_array(pos_loc);
        self.gl.vertex_attrib_pointer_with_i32(shade_loc, 3, WebGlRenderingContext::FLOAT, false, stride, 12);
        self.gl.enable_vertex_attrib_array(shade_loc);

        self.gl.uniform3f(Some(&self.color_location), color.0, color.1, color.2);

        let mvp = view_projection * model;
        self.gl.uniform_matrix4fv_with_f32_array(Some(&self.mvp_location), false, mvp.as_slice());

        self.gl.draw_elements_with_i32(
            WebGlRenderingContext::TRIANGLES,
            mesh.index_count,
            WebGlRenderingContext::UNSIGNED_SHORT,
            0,
        );
    }
}

/// One frame's worth of drawing: the renderer plus the camera it draws through.
pub struct FrameTarget<'a> {
    renderer: &'a Renderer,
    view_projection: Matrix4<f32>,
}

impl<'a> FrameTarget<'a> {
    pub fn new(renderer: &'a Renderer, projection: &Matrix4<f32>, view: &Matrix4<f32>) -> Self {
        FrameTarget { renderer, view_projection: projection * view }
    }
}

impl DrawPrimitive for FrameTarget<'_> {
    fn draw_primitive(&mut self, primitive: Primitive, pose: &Pose, material: Material) {
        self.renderer.draw(primitive, pose.matrix(), material.color(), &self.view_projection);
    }
}

fn upload(gl: &WebGlRenderingContext, mesh: &Mesh) -> Result<GpuMesh, JsValue> {
    let vertex_buffer = gl.create_buffer().ok_or("Failed to create vertex buffer")?;
    let index_buffer = gl.create_buffer().ok_or("Failed to create index buffer")?;

    gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&vertex_buffer));
    unsafe {
        let vert_array = js_sys::Float32Array::view(&mesh.vertices);
        gl.buffer_data_with_array_buffer_view(
            WebGlRenderingContext::ARRAY_BUFFER,
            &vert_array,
            WebGlRenderingContext::STATIC_DRAW,
        );
    }

    gl.bind_buffer(WebGlRenderingContext::ELEMENT_ARRAY_BUFFER, Some(&index_buffer));
    unsafe {
        let idx_array = js_sys::Uint16Array::view(&mesh.indices);
        gl.buffer_data_with_array_buffer_view(
            WebGlRenderingContext::ELEMENT_ARRAY_BUFFER,
            &idx_array,
            WebGlRenderingContext::STATIC_DRAW,
        );
    }

    Ok(GpuMesh { vertex_buffer, index_buffer, index_count: mesh.indices.len() as i32 })
}

fn create_program(gl: &WebGlRenderingContext) -> Result<WebGlProgram, JsValue> {
    let vert_shader = compile_shader(gl, WebGlRenderingContext::VERTEX_SHADER, VERTEX_SHADER)?;
    let frag_shader = compile_shader(gl, WebGlRenderingContext::FRAGMENT_SHADER, FRAGMENT_SHADER)?;

    let program = gl.create_program().ok_or("Unable to create program")?;
    gl.attach_shader(&program, &vert_shader);
    gl.attach_shader(&program, &frag_shader);
    gl.link_program(&program);

    if gl.get_program_parameter(&program, WebGlRenderingContext::LINK_STATUS).as_bool().unwrap_or(false) {
        Ok(program)
    } else {
        Err(JsValue::from_str(&gl.get_program_info_log(&program).unwrap_or_default()))
    }
}

fn compile_shader(gl: &WebGlRenderingContext, shader_type: u32, source: &str) -> Result<web_sys::WebGlShader, JsValue> {
    let shader = gl.create_shader(shader_type).ok_or("Unable to create shader")?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl.get_shader_parameter(&shader, WebGlRenderingContext::COMPILE_STATUS).as_bool().unwrap_or(false) {
        Ok(shader)
    } else {
        Err(JsValue::from_str(&gl.get_shader_info_log(&shader).unwrap_or_default()))
    }
}
